use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct WithdrawalRequest {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
    pub method: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewWithdrawal {
    pub user_id: String,
    pub amount: f64,
    pub method: String,
    pub account_holder_name: String,
    pub account_number: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}
