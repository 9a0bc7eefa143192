use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::settings::Settings;

pub mod http;
pub mod machines;
pub mod mining;
pub mod users;
pub mod withdrawals;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotReady(String),
    #[error("{0}")]
    InsufficientFunds(String),
    #[error("{0}")]
    RentalLimit(String),
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Database(e.to_string())
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let (user_tx, mut user_rx) = mpsc::channel(512);
    let (mining_tx, mut mining_rx) = mpsc::channel(512);
    let (machine_tx, mut machine_rx) = mpsc::channel(512);
    let (withdrawal_tx, mut withdrawal_rx) = mpsc::channel(512);

    let mut user_service = users::UserService::new();
    let mut mining_service = mining::MiningService::new();
    let mut machine_service = machines::MachineService::new();
    let mut withdrawal_service = withdrawals::WithdrawalService::new();

    log::info!("Starting user service.");
    let user_pool = pool.clone();
    let user_rewards = settings.rewards.clone();
    tokio::spawn(async move {
        user_service
            .run(
                users::UserRequestHandler::new(user_pool, user_rewards),
                &mut user_rx,
            )
            .await;
    });

    log::info!("Starting mining service.");
    let mining_pool = pool.clone();
    let mining_rewards = settings.rewards.clone();
    tokio::spawn(async move {
        mining_service
            .run(
                mining::MiningRequestHandler::new(mining_pool, mining_rewards),
                &mut mining_rx,
            )
            .await;
    });

    log::info!("Starting machine service.");
    let machine_pool = pool.clone();
    tokio::spawn(async move {
        machine_service
            .run(
                machines::MachineRequestHandler::new(machine_pool),
                &mut machine_rx,
            )
            .await;
    });

    log::info!("Starting withdrawal service.");
    let withdrawal_pool = pool.clone();
    let withdrawal_rewards = settings.rewards.clone();
    tokio::spawn(async move {
        withdrawal_service
            .run(
                withdrawals::WithdrawalRequestHandler::new(withdrawal_pool, withdrawal_rewards),
                &mut withdrawal_rx,
            )
            .await;
    });

    log::info!("Starting HTTP server.");
    let bind_address = settings.http.bind_address.clone();
    http::start_http_server(bind_address, user_tx, mining_tx, machine_tx, withdrawal_tx).await?;

    Ok(())
}
