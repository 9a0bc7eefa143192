use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct MiningSession {
    pub id: String,
    pub user_id: String,
    pub started_at: chrono::NaiveDateTime,
    pub ends_at: chrono::NaiveDateTime,
    pub claimed: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionRequest {
    pub user_id: String,
}

/// Result of a successful claim: the credited amount and how many unexpired
/// machines contributed to it.
#[derive(Clone, Debug, Serialize)]
pub struct ClaimOutcome {
    pub reward: f64,
    pub machine_count: usize,
    pub claimed: bool,
}
