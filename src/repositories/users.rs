use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::users::{
    DepositRequest, ReferralCommission, ReferralSummary, ReferredUser, User,
};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct UserRepository {
    conn: PgPool,
}

fn new_referral_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Signup hits two UNIQUE constraints: the username (the caller's conflict)
/// and the generated referral code (ours to retry).
fn is_username_conflict(constraint: Option<&str>) -> bool {
    matches!(constraint, Some("users_username_key"))
}

impl UserRepository {
    pub fn new(conn: PgPool) -> Self {
        UserRepository { conn }
    }

    pub async fn insert_user(
        &self,
        username: &str,
        password_digest: &str,
        phone_number: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<User, ServiceError> {
        let referred_by = match referral_code {
            Some(code) => {
                sqlx::query_scalar::<_, String>(
                    "SELECT id FROM users WHERE referral_code = $1",
                )
                .bind(code)
                .fetch_optional(&self.conn)
                .await?
            }
            None => None,
        };

        for _ in 0..3 {
            let result = sqlx::query_as::<_, User>(
                r#"INSERT INTO users
                (id, username, password, phone_number, balance, total_miners,
                 referral_code, referred_by, total_referral_earnings, created_at)
                VALUES ($1, $2, $3, $4, 0, 0, $5, $6, 0, $7)
                RETURNING *"#,
            )
            .bind(Uuid::new_v4().hyphenated().to_string())
            .bind(username)
            .bind(password_digest)
            .bind(phone_number)
            .bind(new_referral_code())
            .bind(referred_by.clone())
            .bind(Utc::now().naive_utc())
            .fetch_one(&self.conn)
            .await;

            match result {
                Ok(user) => return Ok(user),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    if is_username_conflict(db.constraint()) {
                        return Err(ServiceError::Conflict(
                            "Username already exists".to_string(),
                        ));
                    }
                    // Referral code collision: loop again with a fresh one.
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Database(
            "Could not allocate a referral code".to_string(),
        ))
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn referral_summary(&self, user_id: &str) -> Result<ReferralSummary, ServiceError> {
        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let referred_users = sqlx::query_as::<_, ReferredUser>(
            r#"SELECT id, username, total_miners, created_at
            FROM users WHERE referred_by = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        let commissions = sqlx::query_as::<_, ReferralCommission>(
            "SELECT * FROM referral_commissions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(ReferralSummary {
            referral_code: user.referral_code,
            total_referral_earnings: user.total_referral_earnings,
            referred_users,
            commissions,
        })
    }

    pub async fn insert_deposit(
        &self,
        user_id: &str,
        amount: f64,
        transaction_id: &str,
    ) -> Result<DepositRequest, ServiceError> {
        let user = self.get_user_by_id(user_id).await?;
        if user.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let deposit = sqlx::query_as::<_, DepositRequest>(
            r#"INSERT INTO deposit_requests (id, user_id, amount, transaction_id, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4().hyphenated().to_string())
        .bind(user_id)
        .bind(amount)
        .bind(transaction_id)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.conn)
        .await?;

        Ok(deposit)
    }

    pub async fn list_deposits(&self, user_id: &str) -> Result<Vec<DepositRequest>, ServiceError> {
        let deposits = sqlx::query_as::<_, DepositRequest>(
            "SELECT * FROM deposit_requests WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(deposits)
    }

    /// Administrative transition, pending -> approved | rejected, forward
    /// only. Approval credits the amount and pays the inviter a level-1
    /// commission in the same transaction.
    pub async fn update_deposit_status(
        &self,
        deposit_id: &str,
        status: &str,
        commission_rate: f64,
    ) -> Result<DepositRequest, ServiceError> {
        let mut tx = self.conn.begin().await?;

        let deposit = sqlx::query_as::<_, DepositRequest>(
            "SELECT * FROM deposit_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(deposit_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Deposit not found".to_string()))?;

        if deposit.status != "pending" {
            return Err(ServiceError::Conflict(format!(
                "Deposit already {}",
                deposit.status
            )));
        }

        if status == "approved" {
            let referred_by: Option<String> = sqlx::query_scalar(
                "SELECT referred_by FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(&deposit.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .flatten();

            sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
                .bind(deposit.amount)
                .bind(&deposit.user_id)
                .execute(&mut *tx)
                .await?;

            if let Some(inviter_id) = referred_by {
                let commission = deposit.amount * commission_rate;

                sqlx::query(
                    r#"INSERT INTO referral_commissions
                    (id, user_id, from_user_id, deposit_id, level, amount, created_at)
                    VALUES ($1, $2, $3, $4, 1, $5, $6)"#,
                )
                .bind(Uuid::new_v4().hyphenated().to_string())
                .bind(&inviter_id)
                .bind(&deposit.user_id)
                .bind(deposit_id)
                .bind(commission)
                .bind(Utc::now().naive_utc())
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    r#"UPDATE users
                    SET balance = balance + $1,
                        total_referral_earnings = total_referral_earnings + $1
                    WHERE id = $2"#,
                )
                .bind(commission)
                .bind(&inviter_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        let deposit = sqlx::query_as::<_, DepositRequest>(
            "UPDATE deposit_requests SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(deposit_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(deposit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_codes_are_short_uppercase_hex() {
        let code = new_referral_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(code, new_referral_code());
    }

    #[test]
    fn only_the_username_constraint_reports_a_conflict() {
        assert!(is_username_conflict(Some("users_username_key")));
        assert!(!is_username_conflict(Some("users_referral_code_key")));
        assert!(!is_username_conflict(None));
    }
}
