use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::sessions::{ClaimOutcome, MiningSession};
use crate::repositories::sessions::SessionRepository;
use crate::settings::Rewards;

pub enum MiningRequest {
    GetActiveSession {
        user_id: String,
        response: oneshot::Sender<Result<Option<MiningSession>, ServiceError>>,
    },
    StartSession {
        user_id: String,
        response: oneshot::Sender<Result<MiningSession, ServiceError>>,
    },
    ClaimReward {
        user_id: String,
        response: oneshot::Sender<Result<ClaimOutcome, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct MiningRequestHandler {
    repository: SessionRepository,
    rewards: Rewards,
}

impl MiningRequestHandler {
    pub fn new(sql_conn: PgPool, rewards: Rewards) -> Self {
        let repository = SessionRepository::new(sql_conn);

        MiningRequestHandler { repository, rewards }
    }
}

#[async_trait]
impl RequestHandler<MiningRequest> for MiningRequestHandler {
    async fn handle_request(&self, request: MiningRequest) {
        match request {
            MiningRequest::GetActiveSession { user_id, response } => {
                let session = self.repository.get_active_session(&user_id).await;
                let _ = response.send(session);
            }
            MiningRequest::StartSession { user_id, response } => {
                let session = self
                    .repository
                    .start_session(&user_id, self.rewards.session_hours)
                    .await;
                let _ = response.send(session);
            }
            MiningRequest::ClaimReward { user_id, response } => {
                let outcome = self
                    .repository
                    .claim_reward(&user_id, self.rewards.base_reward)
                    .await;
                let _ = response.send(outcome);
            }
        }
    }
}

pub struct MiningService;

impl MiningService {
    pub fn new() -> Self {
        MiningService {}
    }
}

#[async_trait]
impl Service<MiningRequest, MiningRequestHandler> for MiningService {}
