use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::users::{DepositRequest, NewDeposit, NewUser, ReferralSummary, User};
use crate::repositories::users::UserRepository;
use crate::settings::Rewards;

pub enum UserRequest {
    Signup {
        new_user: NewUser,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    Login {
        username: String,
        password: String,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    GetUser {
        id: String,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    GetReferrals {
        user_id: String,
        response: oneshot::Sender<Result<ReferralSummary, ServiceError>>,
    },
    RequestDeposit {
        deposit: NewDeposit,
        response: oneshot::Sender<Result<DepositRequest, ServiceError>>,
    },
    ListDeposits {
        user_id: String,
        response: oneshot::Sender<Result<Vec<DepositRequest>, ServiceError>>,
    },
    UpdateDepositStatus {
        deposit_id: String,
        status: String,
        response: oneshot::Sender<Result<DepositRequest, ServiceError>>,
    },
}

pub fn password_digest(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn validate_signup(new_user: &NewUser) -> Result<(), ServiceError> {
    if new_user.username.len() < 3 {
        return Err(ServiceError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if new_user.password.len() < 6 {
        return Err(ServiceError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if let Some(phone) = &new_user.phone_number {
        if phone.len() != 11 || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ServiceError::Validation(
                "Phone number must be 11 digits".to_string(),
            ));
        }
    }

    Ok(())
}

#[derive(Clone)]
pub struct UserRequestHandler {
    repository: UserRepository,
    rewards: Rewards,
}

impl UserRequestHandler {
    pub fn new(sql_conn: PgPool, rewards: Rewards) -> Self {
        let repository = UserRepository::new(sql_conn);

        UserRequestHandler { repository, rewards }
    }

    async fn signup(&self, new_user: NewUser) -> Result<User, ServiceError> {
        validate_signup(&new_user)?;

        self.repository
            .insert_user(
                &new_user.username,
                &password_digest(&new_user.password),
                new_user.phone_number.as_deref(),
                new_user.referral_code.as_deref(),
            )
            .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self.repository.get_user_by_username(username).await?;

        match user {
            Some(user) if user.password == password_digest(password) => Ok(user),
            _ => Err(ServiceError::Unauthorized(
                "Invalid credentials".to_string(),
            )),
        }
    }

    async fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        self.repository
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    async fn request_deposit(&self, deposit: NewDeposit) -> Result<DepositRequest, ServiceError> {
        if deposit.amount < self.rewards.min_deposit {
            return Err(ServiceError::Validation(format!(
                "Minimum deposit is {} PKR",
                self.rewards.min_deposit
            )));
        }
        if deposit.transaction_id.len() < 5 {
            return Err(ServiceError::Validation(
                "Enter a valid transaction ID".to_string(),
            ));
        }

        self.repository
            .insert_deposit(&deposit.user_id, deposit.amount, &deposit.transaction_id)
            .await
    }

    async fn update_deposit_status(
        &self,
        deposit_id: &str,
        status: &str,
    ) -> Result<DepositRequest, ServiceError> {
        if status != "approved" && status != "rejected" {
            return Err(ServiceError::Validation(format!(
                "Unknown deposit status: {}",
                status
            )));
        }

        self.repository
            .update_deposit_status(deposit_id, status, self.rewards.referral_commission_rate)
            .await
    }
}

#[async_trait]
impl RequestHandler<UserRequest> for UserRequestHandler {
    async fn handle_request(&self, request: UserRequest) {
        match request {
            UserRequest::Signup { new_user, response } => {
                let user = self.signup(new_user).await;
                let _ = response.send(user);
            }
            UserRequest::Login {
                username,
                password,
                response,
            } => {
                let user = self.login(&username, &password).await;
                let _ = response.send(user);
            }
            UserRequest::GetUser { id, response } => {
                let user = self.get_user(&id).await;
                let _ = response.send(user);
            }
            UserRequest::GetReferrals { user_id, response } => {
                let summary = self.repository.referral_summary(&user_id).await;
                let _ = response.send(summary);
            }
            UserRequest::RequestDeposit { deposit, response } => {
                let deposit = self.request_deposit(deposit).await;
                let _ = response.send(deposit);
            }
            UserRequest::ListDeposits { user_id, response } => {
                let deposits = self.repository.list_deposits(&user_id).await;
                let _ = response.send(deposits);
            }
            UserRequest::UpdateDepositStatus {
                deposit_id,
                status,
                response,
            } => {
                let deposit = self.update_deposit_status(&deposit_id, &status).await;
                let _ = response.send(deposit);
            }
        }
    }
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        UserService {}
    }
}

#[async_trait]
impl Service<UserRequest, UserRequestHandler> for UserService {}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str, phone: Option<&str>) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            phone_number: phone.map(str::to_string),
            referral_code: None,
        }
    }

    #[test]
    fn signup_validation() {
        assert!(validate_signup(&new_user("ali", "secret1", None)).is_ok());
        assert!(validate_signup(&new_user("al", "secret1", None)).is_err());
        assert!(validate_signup(&new_user("ali", "short", None)).is_err());
        assert!(validate_signup(&new_user("ali", "secret1", Some("03001234567"))).is_ok());
        assert!(validate_signup(&new_user("ali", "secret1", Some("0300123456"))).is_err());
        assert!(validate_signup(&new_user("ali", "secret1", Some("03001234a67"))).is_err());
    }

    #[test]
    fn digest_is_stable_and_hex() {
        let digest = password_digest("secret1");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, password_digest("secret1"));
        assert_ne!(digest, password_digest("secret2"));
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
