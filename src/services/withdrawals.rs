use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::withdrawals::{NewWithdrawal, WithdrawalRequest};
use crate::repositories::withdrawals::WithdrawalRepository;
use crate::settings::Rewards;

pub enum WithdrawalServiceRequest {
    List {
        user_id: String,
        response: oneshot::Sender<Result<Vec<WithdrawalRequest>, ServiceError>>,
    },
    Request {
        withdrawal: NewWithdrawal,
        response: oneshot::Sender<Result<WithdrawalRequest, ServiceError>>,
    },
    UpdateStatus {
        withdrawal_id: String,
        status: String,
        response: oneshot::Sender<Result<WithdrawalRequest, ServiceError>>,
    },
}

pub fn validate_withdrawal(withdrawal: &NewWithdrawal, min_withdrawal: f64) -> Result<(), ServiceError> {
    if withdrawal.amount < min_withdrawal {
        return Err(ServiceError::Validation(format!(
            "Minimum withdrawal is {} PKR",
            min_withdrawal
        )));
    }
    if withdrawal.account_holder_name.len() < 3 {
        return Err(ServiceError::Validation(
            "Enter account holder name".to_string(),
        ));
    }
    if withdrawal.account_number.len() < 11 {
        return Err(ServiceError::Validation(
            "Enter a valid account number".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), ServiceError> {
    match status {
        "completed" | "rejected" => Ok(()),
        _ => Err(ServiceError::Validation(format!(
            "Unknown withdrawal status: {}",
            status
        ))),
    }
}

#[derive(Clone)]
pub struct WithdrawalRequestHandler {
    repository: WithdrawalRepository,
    rewards: Rewards,
}

impl WithdrawalRequestHandler {
    pub fn new(sql_conn: PgPool, rewards: Rewards) -> Self {
        let repository = WithdrawalRepository::new(sql_conn);

        WithdrawalRequestHandler { repository, rewards }
    }

    async fn request_withdrawal(
        &self,
        withdrawal: NewWithdrawal,
    ) -> Result<WithdrawalRequest, ServiceError> {
        validate_withdrawal(&withdrawal, self.rewards.min_withdrawal)?;

        self.repository
            .request_withdrawal(&withdrawal, self.rewards.withdrawal_tax_rate)
            .await
    }

    async fn update_status(
        &self,
        withdrawal_id: &str,
        status: &str,
    ) -> Result<WithdrawalRequest, ServiceError> {
        validate_status(status)?;

        self.repository.update_status(withdrawal_id, status).await
    }
}

#[async_trait]
impl RequestHandler<WithdrawalServiceRequest> for WithdrawalRequestHandler {
    async fn handle_request(&self, request: WithdrawalServiceRequest) {
        match request {
            WithdrawalServiceRequest::List { user_id, response } => {
                let withdrawals = self.repository.list_withdrawals(&user_id).await;
                let _ = response.send(withdrawals);
            }
            WithdrawalServiceRequest::Request {
                withdrawal,
                response,
            } => {
                let withdrawal = self.request_withdrawal(withdrawal).await;
                let _ = response.send(withdrawal);
            }
            WithdrawalServiceRequest::UpdateStatus {
                withdrawal_id,
                status,
                response,
            } => {
                let withdrawal = self.update_status(&withdrawal_id, &status).await;
                let _ = response.send(withdrawal);
            }
        }
    }
}

pub struct WithdrawalService;

impl WithdrawalService {
    pub fn new() -> Self {
        WithdrawalService {}
    }
}

#[async_trait]
impl Service<WithdrawalServiceRequest, WithdrawalRequestHandler> for WithdrawalService {}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdrawal(amount: f64) -> NewWithdrawal {
        NewWithdrawal {
            user_id: "u1".to_string(),
            amount,
            method: "easypaisa".to_string(),
            account_holder_name: "Ali Khan".to_string(),
            account_number: "03001234567".to_string(),
        }
    }

    #[test]
    fn rejects_below_minimum() {
        assert!(matches!(
            validate_withdrawal(&withdrawal(499.0), 500.0),
            Err(ServiceError::Validation(_))
        ));
        assert!(validate_withdrawal(&withdrawal(500.0), 500.0).is_ok());
    }

    #[test]
    fn rejects_malformed_account() {
        let mut w = withdrawal(600.0);
        w.account_number = "123".to_string();
        assert!(validate_withdrawal(&w, 500.0).is_err());

        let mut w = withdrawal(600.0);
        w.account_holder_name = "A".to_string();
        assert!(validate_withdrawal(&w, 500.0).is_err());
    }

    #[test]
    fn status_transitions_are_known() {
        assert!(validate_status("completed").is_ok());
        assert!(validate_status("rejected").is_ok());
        assert!(validate_status("pending").is_err());
        assert!(validate_status("done").is_err());
    }
}
