use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::machines::{Machine, OwnedMachineView};
use crate::models::users::User;
use crate::repositories::machines::MachineRepository;
use crate::{catalog, rewards};

pub enum MachineRequest {
    ListCatalog {
        response: oneshot::Sender<Result<Vec<Machine>, ServiceError>>,
    },
    ListOwned {
        user_id: String,
        response: oneshot::Sender<Result<Vec<OwnedMachineView>, ServiceError>>,
    },
    Rent {
        user_id: String,
        machine_id: String,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct MachineRequestHandler {
    repository: MachineRepository,
}

impl MachineRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = MachineRepository::new(sql_conn);

        MachineRequestHandler { repository }
    }

    async fn list_owned(&self, user_id: &str) -> Result<Vec<OwnedMachineView>, ServiceError> {
        let owned = self.repository.list_owned(user_id).await?;
        let now = Utc::now().naive_utc();

        Ok(owned
            .iter()
            .filter_map(|row| rewards::owned_view(row, now))
            .collect())
    }
}

#[async_trait]
impl RequestHandler<MachineRequest> for MachineRequestHandler {
    async fn handle_request(&self, request: MachineRequest) {
        match request {
            MachineRequest::ListCatalog { response } => {
                let _ = response.send(Ok(catalog::all().to_vec()));
            }
            MachineRequest::ListOwned { user_id, response } => {
                let owned = self.list_owned(&user_id).await;
                let _ = response.send(owned);
            }
            MachineRequest::Rent {
                user_id,
                machine_id,
                response,
            } => {
                let user = self.repository.rent_machine(&user_id, &machine_id).await;
                let _ = response.send(user);
            }
        }
    }
}

pub struct MachineService;

impl MachineService {
    pub fn new() -> Self {
        MachineService {}
    }
}

#[async_trait]
impl Service<MachineRequest, MachineRequestHandler> for MachineService {}
