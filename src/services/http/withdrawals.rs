use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tokio::sync::oneshot;

use super::{round_trip, AppState};
use crate::models::withdrawals::{NewWithdrawal, StatusUpdate};
use crate::services::withdrawals::WithdrawalServiceRequest;

pub async fn list_withdrawals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.withdrawal_channel,
        WithdrawalServiceRequest::List {
            user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn request_withdrawal(
    State(state): State<AppState>,
    Json(req): Json<NewWithdrawal>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.withdrawal_channel,
        WithdrawalServiceRequest::Request {
            withdrawal: req,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.withdrawal_channel,
        WithdrawalServiceRequest::UpdateStatus {
            withdrawal_id: id,
            status: req.status,
            response: tx,
        },
        rx,
    )
    .await
}
