//! Logout Use Case
//!
//! Revokes the session behind a refresh secret. Idempotent: logging out
//! twice, or with a token the server never issued, still succeeds from
//! the client's point of view. The miss is only logged.

use std::sync::Arc;

use crate::domain::repository::SessionStore;
use crate::error::AuthResult;
use crate::token::hash_opaque_secret;

pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let hash = hash_opaque_secret(refresh_token);
        let revoked = self.store.revoke_by_refresh_hash(&hash).await?;

        if revoked == 0 {
            tracing::warn!("Logout presented an unknown or already-revoked refresh token");
        } else {
            tracing::info!(sessions_revoked = revoked, "Logout revoked session");
        }

        Ok(())
    }
}
