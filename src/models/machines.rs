use serde::{Deserialize, Serialize};

/// Catalog entry. The table itself lives in `crate::catalog` and never
/// changes at runtime.
#[derive(Clone, Debug, Serialize)]
pub struct Machine {
    pub id: &'static str,
    pub name: &'static str,
    pub level: i32,
    pub price: f64,
    pub daily_profit: f64,
    pub duration_days: i64,
    pub max_rentals: i64,
}

/// One purchased unit. Expiry is derived from `purchased_at`, never stored.
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct OwnedMachine {
    pub id: String,
    pub user_id: String,
    pub machine_id: String,
    pub purchased_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RentRequest {
    pub user_id: String,
    pub machine_id: String,
}

/// Owned row augmented with the derived lifecycle fields the client renders.
#[derive(Clone, Debug, Serialize)]
pub struct OwnedMachineView {
    pub id: String,
    pub machine_id: String,
    pub name: String,
    pub daily_profit: f64,
    pub purchased_at: chrono::NaiveDateTime,
    pub expires_at: chrono::NaiveDateTime,
    pub elapsed_days: i64,
    pub remaining_days: i64,
    pub percent_complete: f64,
    pub expired: bool,
}
