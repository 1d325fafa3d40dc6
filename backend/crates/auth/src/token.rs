//! Token Codec
//!
//! Two token shapes back every session:
//! - Access token: HS256 JWT carrying the principal id and level.
//!   Stateless, short-lived, verified on every request.
//! - Refresh secret: 48 random bytes, hex encoded (96 characters).
//!   Opaque to the client; the server stores only its SHA-256 hash.
//!
//! Verification is pinned to HS256. A token whose header names any
//! other algorithm is rejected before signature checking, which closes
//! the classic algorithm-confusion downgrade.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::ConfigError;
use crate::error::{AuthError, AuthResult};

/// `typ` claim value stamped into every access token
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Raw entropy per refresh secret, before hex encoding
const OPAQUE_SECRET_BYTES: usize = 48;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Principal id (admin or customer UUID)
    pub sub: String,
    /// Authorization level code ("staff", "super_admin", "customer")
    pub level: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Token type discriminator, always "access"
    pub typ: String,
}

impl AccessClaims {
    /// Parse the subject claim back into a principal id
    pub fn principal_id(&self) -> AuthResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// Signs and verifies access tokens with a single shared HMAC secret
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issue a signed access token for a principal
    pub fn issue_access_token(
        &self,
        principal_id: Uuid,
        level: &str,
        ttl: Duration,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = AccessClaims {
            sub: principal_id.to_string(),
            level: level.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Access token signing failed: {e}")))?;
        Ok((token, expires_at))
    }

    /// Verify signature, expiry and token type
    ///
    /// All failure modes collapse into [`AuthError::InvalidToken`] so
    /// callers cannot accidentally leak why verification failed.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a hard boundary, no clock leeway
        validation.leeway = 0;
        let data = decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        if data.claims.typ != ACCESS_TOKEN_TYPE {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}

/// Generate a fresh refresh secret
///
/// Returns `(plaintext, sha256_hex)`. The plaintext goes to the client
/// once and is never stored; lookups use the hash.
pub fn issue_opaque_secret() -> (String, String) {
    let plain = hex::encode(platform::crypto::random_bytes(OPAQUE_SECRET_BYTES));
    let hash = hash_opaque_secret(&plain);
    (plain, hash)
}

/// Hash a refresh secret for storage or lookup
pub fn hash_opaque_secret(plain: &str) -> String {
    platform::crypto::sha256_hex(plain.as_bytes())
}
