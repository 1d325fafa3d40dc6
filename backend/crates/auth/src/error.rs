//! Auth error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kernel::error::{app_error::AppError, kind::ErrorKind};

use crate::application::config::ConfigError;

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
///
/// Credential and token failures deliberately map to the same generic
/// wire messages so responses never reveal whether an account exists
/// or which verification step failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Principal exists but is deactivated
    #[error("Account is inactive")]
    AccountInactive,

    /// Access token is missing, malformed, tampered with, or expired
    #[error("Invalid or expired access token")]
    InvalidToken,

    /// Refresh secret does not match any stored session
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Refresh session was already consumed or logged out
    #[error("Refresh token has been revoked")]
    RevokedToken,

    /// Refresh session exists but is past its expiry
    #[error("Refresh token has expired")]
    ExpiredToken,

    /// Registration email already belongs to a customer
    #[error("Email address is already registered")]
    EmailTaken,

    /// Registration email failed format validation
    #[error("Invalid email address")]
    InvalidEmail,

    /// Registration password failed the password policy
    #[error("{0}")]
    PasswordPolicy(String),

    /// Token signing configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database error
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::InvalidRefreshToken
            | Self::RevokedToken
            | Self::ExpiredToken => StatusCode::UNAUTHORIZED,
            Self::AccountInactive => StatusCode::FORBIDDEN,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidEmail | Self::PasswordPolicy(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Map to the kernel error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::InvalidRefreshToken
            | Self::RevokedToken
            | Self::ExpiredToken => ErrorKind::Unauthorized,
            Self::AccountInactive => ErrorKind::Forbidden,
            Self::EmailTaken => ErrorKind::Conflict,
            Self::InvalidEmail | Self::PasswordPolicy(_) => ErrorKind::BadRequest,
            Self::Config(_) | Self::Internal(_) => ErrorKind::InternalServerError,
            Self::Storage(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Convert to AppError, hiding server-side detail from the wire
    pub fn to_app_error(&self) -> AppError {
        match self {
            Self::Storage(_) => AppError::service_unavailable("Service temporarily unavailable"),
            Self::Config(_) | Self::Internal(_) => AppError::internal("Internal server error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log with severity matched to the error class
    fn log(&self) {
        match self {
            Self::Storage(e) => {
                tracing::error!(error = %e, "Database error during authentication");
            }
            Self::Config(e) => {
                tracing::error!(error = %e, "Auth configuration error");
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal auth error");
            }
            Self::AccountInactive => {
                tracing::warn!("Authentication attempt for inactive account");
            }
            other => {
                tracing::debug!(error = %other, "Authentication rejected");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::RevokedToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountInactive.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::PasswordPolicy("too short".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_credential_errors_share_generic_message() {
        // Unknown email and wrong password must be indistinguishable
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_storage_detail_is_hidden_on_the_wire() {
        let err = AuthError::Storage(sqlx::Error::PoolTimedOut);
        let app_error = err.to_app_error();
        assert_eq!(app_error.message(), "Service temporarily unavailable");
    }
}
