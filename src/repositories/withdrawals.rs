use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::withdrawals::{NewWithdrawal, WithdrawalRequest};
use crate::rewards;
use crate::services::ServiceError;

#[derive(Clone)]
pub struct WithdrawalRepository {
    conn: PgPool,
}

impl WithdrawalRepository {
    pub fn new(conn: PgPool) -> Self {
        WithdrawalRepository { conn }
    }

    pub async fn list_withdrawals(
        &self,
        user_id: &str,
    ) -> Result<Vec<WithdrawalRequest>, ServiceError> {
        let withdrawals = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(withdrawals)
    }

    /// Funds are reserved at request time: the balance is debited here and
    /// only credited back if an administrator rejects the request.
    pub async fn request_withdrawal(
        &self,
        req: &NewWithdrawal,
        tax_rate: f64,
    ) -> Result<WithdrawalRequest, ServiceError> {
        let mut tx = self.conn.begin().await?;

        let balance: Option<(f64,)> =
            sqlx::query_as("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(&req.user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let balance = match balance {
            Some((balance,)) => balance,
            None => return Err(ServiceError::NotFound("User not found".to_string())),
        };

        if balance < req.amount {
            return Err(ServiceError::InsufficientFunds(
                "Insufficient balance".to_string(),
            ));
        }

        sqlx::query("UPDATE users SET balance = balance - $1 WHERE id = $2")
            .bind(req.amount)
            .bind(&req.user_id)
            .execute(&mut *tx)
            .await?;

        let (tax_amount, net_amount) = rewards::tax_split(req.amount, tax_rate);

        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            r#"INSERT INTO withdrawal_requests
            (id, user_id, amount, tax_amount, net_amount, method,
             account_holder_name, account_number, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4().hyphenated().to_string())
        .bind(&req.user_id)
        .bind(req.amount)
        .bind(tax_amount)
        .bind(net_amount)
        .bind(&req.method)
        .bind(&req.account_holder_name)
        .bind(&req.account_number)
        .bind(Utc::now().naive_utc())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(withdrawal)
    }

    /// Administrative transition, pending -> completed | rejected, forward
    /// only. Rejection releases the reserved funds back to the user.
    pub async fn update_status(
        &self,
        withdrawal_id: &str,
        status: &str,
    ) -> Result<WithdrawalRequest, ServiceError> {
        let mut tx = self.conn.begin().await?;

        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(withdrawal_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Withdrawal not found".to_string()))?;

        if withdrawal.status != "pending" {
            return Err(ServiceError::Conflict(format!(
                "Withdrawal already {}",
                withdrawal.status
            )));
        }

        if status == "rejected" {
            sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
                .bind(withdrawal.amount)
                .bind(&withdrawal.user_id)
                .execute(&mut *tx)
                .await?;
        }

        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            "UPDATE withdrawal_requests SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(withdrawal_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(withdrawal)
    }
}
