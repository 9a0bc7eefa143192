use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tokio::sync::oneshot;

use super::{round_trip, AppState};
use crate::models::machines::RentRequest;
use crate::services::machines::MachineRequest;

pub async fn list_catalog(State(state): State<AppState>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(&state.machine_channel, MachineRequest::ListCatalog { response: tx }, rx).await
}

pub async fn list_owned(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.machine_channel,
        MachineRequest::ListOwned {
            user_id,
            response: tx,
        },
        rx,
    )
    .await
}

pub async fn rent_machine(State(state): State<AppState>, Json(req): Json<RentRequest>) -> Response {
    let (tx, rx) = oneshot::channel();

    round_trip(
        &state.machine_channel,
        MachineRequest::Rent {
            user_id: req.user_id,
            machine_id: req.machine_id,
            response: tx,
        },
        rx,
    )
    .await
}
