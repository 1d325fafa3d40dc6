//! Login Use Case
//!
//! Email + password authentication. On success a brand-new session is
//! opened; existing sessions for the same principal are left alone, so
//! one account can be signed in from several devices.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AuthConfig;
use crate::application::issue::{IssuedSession, issue_session};
use crate::domain::repository::{PrincipalRepository, SessionStore};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenCodec;

/// Well-formed Argon2id hash that matches no password. Verified on the
/// unknown-email path so a miss burns the same Argon2 cost as a real
/// check and cannot be told apart by response timing.
const DECOY_PHC: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R>
where
    R: PrincipalRepository + SessionStore,
{
    realm: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: PrincipalRepository + SessionStore,
{
    pub fn new(realm: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { realm, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<IssuedSession> {
        // A malformed email can't match any account; same error as a miss
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = ClearTextPassword::login_input(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let principal = match self.realm.find_by_email(&email).await? {
            Some(principal) => principal,
            None => {
                verify_password(decoy_hash()?, password).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(principal.password_hash.clone(), password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        // Credential first, liveness second: a wrong password on an
        // inactive account reads as InvalidCredentials
        if !principal.is_active {
            return Err(AuthError::AccountInactive);
        }

        let codec = TokenCodec::new(&self.config.signing_secret)?;
        let issued = issue_session(&codec, self.realm.as_ref(), &self.config, &principal).await?;

        tracing::info!(
            principal_id = %principal.id,
            session_id = %issued.session_id,
            level = %principal.level,
            "Login succeeded"
        );

        Ok(issued)
    }
}

fn decoy_hash() -> AuthResult<HashedPassword> {
    HashedPassword::from_phc_string(DECOY_PHC)
        .map_err(|_| AuthError::Internal("Decoy verification hash is malformed".into()))
}

/// Run Argon2id verification off the async executor
async fn verify_password(hash: HashedPassword, password: ClearTextPassword) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&password, None))
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoy_hash_is_well_formed() {
        // Must parse as a real PHC string, otherwise verification would
        // short-circuit instead of running Argon2
        let hash = decoy_hash().unwrap();

        let password = ClearTextPassword::login_input("any-password-at-all".to_string()).unwrap();
        assert!(!hash.verify(&password, None));
    }
}
