//! Session Issuance
//!
//! Shared tail of login, register and refresh: mint an access token,
//! mint a refresh secret, persist the session row. The refresh secret
//! leaves this function exactly once, inside the returned bundle.

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::RefreshSession;
use crate::domain::principal::Principal;
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenCodec, issue_opaque_secret};
use kernel::id::SessionId;

/// Everything a client receives when a session is opened or rotated
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
    pub session_id: SessionId,
}

pub(crate) async fn issue_session<S>(
    codec: &TokenCodec,
    store: &S,
    config: &AuthConfig,
    principal: &Principal,
) -> AuthResult<IssuedSession>
where
    S: SessionStore,
{
    let access_ttl = chrono_ttl(config.access_ttl)?;
    let refresh_ttl = chrono_ttl(config.refresh_ttl)?;

    let (access_token, access_expires_at) =
        codec.issue_access_token(principal.id, &principal.level, access_ttl)?;

    let (refresh_token, refresh_hash) = issue_opaque_secret();
    let session = RefreshSession::new(principal.id, refresh_hash, refresh_ttl);
    store.create(&session).await?;

    Ok(IssuedSession {
        access_token,
        access_expires_at,
        refresh_token,
        refresh_expires_at: session.expires_at,
        session_id: session.session_id,
    })
}

pub(crate) fn chrono_ttl(ttl: std::time::Duration) -> AuthResult<chrono::Duration> {
    chrono::Duration::from_std(ttl)
        .map_err(|e| AuthError::Internal(format!("Configured TTL out of range: {e}")))
}
