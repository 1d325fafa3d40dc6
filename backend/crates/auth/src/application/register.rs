//! Register Use Case
//!
//! Self-service customer sign-up for the storefront realm. A successful
//! registration immediately opens a session, so the client lands signed
//! in without a second round trip.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::issue::{IssuedSession, issue_session};
use crate::domain::entity::Customer;
use crate::domain::repository::{CustomerRegistry, SessionStore};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenCodec;
use kernel::id::CustomerId;

#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub customer_id: CustomerId,
    pub session: IssuedSession,
}

pub struct RegisterUseCase<R>
where
    R: CustomerRegistry + SessionStore,
{
    realm: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: CustomerRegistry + SessionStore,
{
    pub fn new(realm: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { realm, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidEmail)?;

        if self.realm.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::PasswordPolicy(e.to_string()))?;
        let password_hash = tokio::task::spawn_blocking(move || password.hash(None))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {e}")))?;

        let customer = Customer::new(email, password_hash, input.full_name.trim().to_string());
        self.realm.create_customer(&customer).await?;

        let principal = customer.to_principal();
        let codec = TokenCodec::new(&self.config.signing_secret)?;
        let session = issue_session(&codec, self.realm.as_ref(), &self.config, &principal).await?;

        tracing::info!(
            customer_id = %customer.customer_id,
            session_id = %session.session_id,
            "Customer registered"
        );

        Ok(RegisterOutput {
            customer_id: customer.customer_id,
            session,
        })
    }
}
