use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tokio::sync::oneshot;

use super::{round_trip, AppState};
use crate::models::users::{Credentials, NewDeposit, NewUser};
use crate::models::withdrawals::StatusUpdate;
use crate::services::users::UserRequest;

pub async fn signup(State(state): State<AppState>, Json(req): Json<NewUser>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::Signup {
            new_user: req,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn login(State(state): State<AppState>, Json(req): Json<Credentials>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::Login {
            username: req.username,
            password: req.password,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(&state.user_channel, UserRequest::GetUser { id, response: tx }, rx).await
}

pub async fn get_referrals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::GetReferrals {
            user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn request_deposit(
    State(state): State<AppState>,
    Json(req): Json<NewDeposit>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::RequestDeposit {
            deposit: req,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn list_deposits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::ListDeposits {
            user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn update_deposit_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.user_channel,
        UserRequest::UpdateDepositStatus {
            deposit_id: id,
            status: req.status,
            response: tx,
        },
        rx,
    )
    .await
}
