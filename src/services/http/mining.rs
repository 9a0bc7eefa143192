use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tokio::sync::oneshot;

use super::{round_trip, AppState};
use crate::models::sessions::SessionRequest;
use crate::services::mining::MiningRequest;

pub async fn get_active_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.mining_channel,
        MiningRequest::GetActiveSession {
            user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.mining_channel,
        MiningRequest::StartSession {
            user_id: req.user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn claim_reward(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.mining_channel,
        MiningRequest::ClaimReward {
            user_id: req.user_id,
            response: tx,
        },
        rx,
    )
    .await
}
