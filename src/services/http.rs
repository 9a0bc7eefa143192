use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::machines::MachineRequest;
use super::mining::MiningRequest;
use super::users::UserRequest;
use super::withdrawals::WithdrawalServiceRequest;
use super::ServiceError;

mod machines;
mod mining;
mod users;
mod withdrawals;

#[derive(Clone)]
pub struct AppState {
    pub user_channel: mpsc::Sender<UserRequest>,
    pub mining_channel: mpsc::Sender<MiningRequest>,
    pub machine_channel: mpsc::Sender<MachineRequest>,
    pub withdrawal_channel: mpsc::Sender<WithdrawalServiceRequest>,
}

pub fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Validation(_)
        | ServiceError::Conflict(_)
        | ServiceError::NotReady(_)
        | ServiceError::InsufficientFunds(_)
        | ServiceError::RentalLimit(_) => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Send one service request and wait for its oneshot reply. A closed channel
/// on either leg is an internal error, not a client one.
pub async fn round_trip<T, R>(
    channel: &mpsc::Sender<T>,
    request: T,
    receiver: oneshot::Receiver<Result<R, ServiceError>>,
) -> Response
where
    T: Send + 'static,
    R: Serialize,
{
    if let Err(e) = channel.send(request).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": format!("Failed to process request: {}", e)})),
        )
            .into_response();
    }

    match receiver.await {
        Ok(Ok(value)) => (StatusCode::OK, Json(json!(value))).into_response(),
        Ok(Err(service_error)) => {
            let status = error_status(&service_error);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                log::error!("Service error: {}", service_error);
                (status, Json(json!({"message": "Server error"}))).into_response()
            } else {
                (status, Json(json!({"message": service_error.to_string()}))).into_response()
            }
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": format!("Failed to receive response: {}", e)})),
        )
            .into_response(),
    }
}

pub async fn start_http_server(
    bind_address: String,
    user_channel: mpsc::Sender<UserRequest>,
    mining_channel: mpsc::Sender<MiningRequest>,
    machine_channel: mpsc::Sender<MachineRequest>,
    withdrawal_channel: mpsc::Sender<WithdrawalServiceRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        user_channel,
        mining_channel,
        machine_channel,
        withdrawal_channel,
    };

    let app = Router::new()
        .route("/api/auth/signup", post(users::signup))
        .route("/api/auth/login", post(users::login))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/referrals/{user_id}", get(users::get_referrals))
        .route("/api/deposits/{user_id}", get(users::list_deposits))
        .route("/api/deposits/request", post(users::request_deposit))
        .route("/api/deposits/{id}/status", put(users::update_deposit_status))
        .route("/api/mining/session/{user_id}", get(mining::get_active_session))
        .route("/api/mining/start", post(mining::start_session))
        .route("/api/mining/claim", post(mining::claim_reward))
        .route("/api/machines", get(machines::list_catalog))
        .route("/api/machines/owned/{user_id}", get(machines::list_owned))
        .route("/api/machines/rent", post(machines::rent_machine))
        .route("/api/withdrawals/{user_id}", get(withdrawals::list_withdrawals))
        .route("/api/withdrawals/request", post(withdrawals::request_withdrawal))
        .route("/api/withdrawals/{id}/status", put(withdrawals::update_status))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_status_mapping() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("c".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotReady("r".into()), StatusCode::BAD_REQUEST),
            (ServiceError::InsufficientFunds("f".into()), StatusCode::BAD_REQUEST),
            (ServiceError::RentalLimit("l".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ServiceError::Database("d".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error_status(&error), status);
        }
    }
}
