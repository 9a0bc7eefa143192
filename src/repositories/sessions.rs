use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::machines::OwnedMachine;
use crate::models::sessions::{ClaimOutcome, MiningSession};
use crate::rewards;
use crate::services::ServiceError;

#[derive(Clone)]
pub struct SessionRepository {
    conn: PgPool,
}

impl SessionRepository {
    pub fn new(conn: PgPool) -> Self {
        SessionRepository { conn }
    }

    pub async fn get_active_session(
        &self,
        user_id: &str,
    ) -> Result<Option<MiningSession>, ServiceError> {
        let session = sqlx::query_as::<_, MiningSession>(
            r#"SELECT * FROM mining_sessions
            WHERE user_id = $1 AND claimed = false
            ORDER BY started_at DESC LIMIT 1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(session)
    }

    pub async fn start_session(
        &self,
        user_id: &str,
        session_hours: i64,
    ) -> Result<MiningSession, ServiceError> {
        let mut tx = self.conn.begin().await?;

        // Lock the user row so two concurrent starts serialize on it.
        let user: Option<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if user.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let open: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM mining_sessions WHERE user_id = $1 AND claimed = false LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if open.is_some() {
            return Err(ServiceError::Conflict(
                "Mining session already active".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let session = sqlx::query_as::<_, MiningSession>(
            r#"INSERT INTO mining_sessions (id, user_id, started_at, ends_at, claimed)
            VALUES ($1, $2, $3, $4, false)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4().hyphenated().to_string())
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::hours(session_hours))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(session)
    }

    /// Claim a matured session: credit the reward and flip the claimed flag,
    /// all in one transaction. The `claimed = false` guard on the final
    /// update makes a racing second claim a no-op.
    pub async fn claim_reward(
        &self,
        user_id: &str,
        base_reward: f64,
    ) -> Result<ClaimOutcome, ServiceError> {
        let mut tx = self.conn.begin().await?;

        let session = sqlx::query_as::<_, MiningSession>(
            r#"SELECT * FROM mining_sessions
            WHERE user_id = $1 AND claimed = false
            ORDER BY started_at DESC LIMIT 1
            FOR UPDATE"#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let session = match session {
            Some(session) => session,
            None => {
                return Err(ServiceError::NotFound(
                    "No active mining session".to_string(),
                ))
            }
        };

        let now = Utc::now().naive_utc();
        if !rewards::session_matured(session.ends_at, now) {
            return Err(ServiceError::NotReady(
                "Mining session not complete".to_string(),
            ));
        }

        let owned = sqlx::query_as::<_, OwnedMachine>(
            "SELECT * FROM owned_machines WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let (reward, machine_count) = rewards::session_reward(&owned, base_reward, now);

        sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
            .bind(reward)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let updated = sqlx::query(
            "UPDATE mining_sessions SET claimed = true WHERE id = $1 AND claimed = false",
        )
        .bind(&session.id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() != 1 {
            return Err(ServiceError::Conflict(
                "Session already claimed".to_string(),
            ));
        }

        tx.commit().await?;

        Ok(ClaimOutcome {
            reward,
            machine_count,
            claimed: true,
        })
    }
}
