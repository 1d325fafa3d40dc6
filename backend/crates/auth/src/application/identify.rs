//! Identify Use Case
//!
//! Resolves a verified access token back to its live principal. Used by
//! the `/me` endpoint and anywhere a handler needs the account behind
//! already-verified claims.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::PrincipalRepository;
use crate::error::{AuthError, AuthResult};
use crate::token::{AccessClaims, TokenCodec};

/// Who the caller is, as exposed on the wire
#[derive(Debug, Clone)]
pub struct IdentityOutput {
    pub principal_id: Uuid,
    pub email: String,
    pub level: String,
}

pub struct IdentifyUseCase<R>
where
    R: PrincipalRepository,
{
    realm: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> IdentifyUseCase<R>
where
    R: PrincipalRepository,
{
    pub fn new(realm: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { realm, config }
    }

    /// Verify a raw token, then resolve the principal
    pub async fn execute(&self, access_token: &str) -> AuthResult<IdentityOutput> {
        let codec = TokenCodec::new(&self.config.signing_secret)?;
        let claims = codec.verify_access_token(access_token)?;
        self.lookup(&claims).await
    }

    /// Resolve the principal behind claims a middleware already verified
    ///
    /// A token whose principal has vanished or been deactivated is
    /// reported exactly like a bad token.
    pub async fn lookup(&self, claims: &AccessClaims) -> AuthResult<IdentityOutput> {
        let principal_id = claims.principal_id()?;

        let principal = self
            .realm
            .find_by_id(principal_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !principal.is_active {
            return Err(AuthError::InvalidToken);
        }

        Ok(IdentityOutput {
            principal_id: principal.id,
            email: principal.email.as_str().to_string(),
            level: principal.level,
        })
    }
}
