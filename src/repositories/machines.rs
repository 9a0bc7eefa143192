use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::machines::OwnedMachine;
use crate::models::users::User;
use crate::services::ServiceError;
use crate::{catalog, rewards};

#[derive(Clone)]
pub struct MachineRepository {
    conn: PgPool,
}

impl MachineRepository {
    pub fn new(conn: PgPool) -> Self {
        MachineRepository { conn }
    }

    pub async fn list_owned(&self, user_id: &str) -> Result<Vec<OwnedMachine>, ServiceError> {
        let owned = sqlx::query_as::<_, OwnedMachine>(
            "SELECT * FROM owned_machines WHERE user_id = $1 ORDER BY purchased_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(owned)
    }

    /// Rent one unit: debit the price, bump the miner counter and record the
    /// ownership row as a single transaction. Partial application would
    /// corrupt the ledger, so any failed precondition rolls the whole thing
    /// back.
    pub async fn rent_machine(
        &self,
        user_id: &str,
        machine_id: &str,
    ) -> Result<User, ServiceError> {
        let machine = catalog::get(machine_id)
            .ok_or_else(|| ServiceError::NotFound("Machine not found".to_string()))?;

        let mut tx = self.conn.begin().await?;

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if user.balance < machine.price {
            return Err(ServiceError::InsufficientFunds(
                "Insufficient balance".to_string(),
            ));
        }

        let owned_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM owned_machines WHERE user_id = $1 AND machine_id = $2",
        )
        .bind(user_id)
        .bind(machine_id)
        .fetch_one(&mut *tx)
        .await?;
        if rewards::rental_capped(owned_count, machine.max_rentals) {
            return Err(ServiceError::RentalLimit(format!(
                "Rental limit reached for {}",
                machine.name
            )));
        }

        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
            SET balance = balance - $1, total_miners = total_miners + 1
            WHERE id = $2
            RETURNING *"#,
        )
        .bind(machine.price)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO owned_machines (id, user_id, machine_id, purchased_at)
            VALUES ($1, $2, $3, $4)"#,
        )
        .bind(Uuid::new_v4().hyphenated().to_string())
        .bind(user_id)
        .bind(machine_id)
        .bind(Utc::now().naive_utc())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }
}
