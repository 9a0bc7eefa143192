use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: Option<String>,
    pub balance: f64,
    pub total_miners: i32,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub total_referral_earnings: f64,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct DepositRequest {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub transaction_id: String,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDeposit {
    pub user_id: String,
    pub amount: f64,
    pub transaction_id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ReferralCommission {
    pub id: String,
    pub user_id: String,
    pub from_user_id: String,
    pub deposit_id: String,
    pub level: i32,
    pub amount: f64,
    pub created_at: chrono::NaiveDateTime,
}

/// A referred user as shown on the inviter's team page.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct ReferredUser {
    pub id: String,
    pub username: String,
    pub total_miners: i32,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReferralSummary {
    pub referral_code: String,
    pub total_referral_earnings: f64,
    pub referred_users: Vec<ReferredUser>,
    pub commissions: Vec<ReferralCommission>,
}
