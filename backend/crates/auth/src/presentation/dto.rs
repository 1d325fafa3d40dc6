//! Request/Response DTOs
//!
//! Wire shapes for the auth endpoints. Timestamps serialize as RFC 3339
//! strings in UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::identify::IdentityOutput;
use crate::application::issue::IssuedSession;
use crate::application::register::RegisterOutput;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

/// Session bundle returned by login, register and refresh
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
    pub session_id: Uuid,
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            access_token: issued.access_token,
            access_expires_at: issued.access_expires_at,
            refresh_token: issued.refresh_token,
            refresh_expires_at: issued.refresh_expires_at,
            session_id: issued.session_id.into_uuid(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub customer_id: Uuid,
    #[serde(flatten)]
    pub session: SessionResponse,
}

impl From<RegisterOutput> for RegisterResponse {
    fn from(output: RegisterOutput) -> Self {
        Self {
            customer_id: output.customer_id.into_uuid(),
            session: output.session.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal_id: Uuid,
    pub email: String,
    pub level: String,
}

impl From<IdentityOutput> for MeResponse {
    fn from(identity: IdentityOutput) -> Self {
        Self {
            principal_id: identity.principal_id,
            email: identity.email,
            level: identity.level,
        }
    }
}
