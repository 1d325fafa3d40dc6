//! Refresh Use Case
//!
//! Rotates a live refresh session: the presented secret is consumed and
//! a fresh access token plus a fresh refresh secret are issued. Each
//! secret works exactly once; a replay after rotation reads as revoked.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue::{IssuedSession, issue_session};
use crate::domain::repository::{PrincipalRepository, SessionStore};
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenCodec, hash_opaque_secret};

pub struct RefreshUseCase<R>
where
    R: PrincipalRepository + SessionStore,
{
    realm: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshUseCase<R>
where
    R: PrincipalRepository + SessionStore,
{
    pub fn new(realm: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { realm, config }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<IssuedSession> {
        let hash = hash_opaque_secret(refresh_token);

        let session = self
            .realm
            .find_by_refresh_hash(&hash)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        // Revocation is reported before expiry: a revoked session stays
        // revoked even once it is also past its expiry
        if session.revoked {
            return Err(AuthError::RevokedToken);
        }
        if session.is_expired() {
            return Err(AuthError::ExpiredToken);
        }

        let principal = self
            .realm
            .find_by_id(session.principal_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;
        if !principal.is_active {
            return Err(AuthError::AccountInactive);
        }

        // Single-use arbitration: the conditional update claims the
        // session, so of N concurrent refreshes exactly one proceeds
        if !self.realm.consume(session.session_id).await? {
            tracing::warn!(
                session_id = %session.session_id,
                principal_id = %session.principal_id,
                "Refresh secret replayed or lost a rotation race"
            );
            return Err(AuthError::RevokedToken);
        }

        let codec = TokenCodec::new(&self.config.signing_secret)?;
        let issued = issue_session(&codec, self.realm.as_ref(), &self.config, &principal).await?;

        tracing::info!(
            principal_id = %principal.id,
            consumed_session = %session.session_id,
            session_id = %issued.session_id,
            "Refresh session rotated"
        );

        Ok(issued)
    }
}
