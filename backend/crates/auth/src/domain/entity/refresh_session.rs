//! Refresh Session Entity
//!
//! One row per issued refresh secret. The secret itself never appears
//! here, only its SHA-256 hash. A session is finished either by expiry
//! or by the `revoked` flag; revoked rows are kept as an audit trail.

use chrono::{DateTime, Duration, Utc};
use kernel::id::SessionId;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub session_id: SessionId,
    /// Owning admin or customer id
    pub principal_id: Uuid,
    /// SHA-256 hex of the opaque refresh secret
    pub refresh_token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once the session is consumed by rotation or logout
    pub revoked: bool,
}

impl RefreshSession {
    /// Open a new session for a principal
    pub fn new(principal_id: Uuid, refresh_token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            principal_id,
            refresh_token_hash,
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
