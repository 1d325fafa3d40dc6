//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, routers, middleware
//! - `token` - Access-token and refresh-secret codec
//!
//! ## Features
//! - Email + password login for two independent principal realms:
//!   administrators and storefront customers
//! - Short-lived HS256 access tokens, long-lived opaque refresh tokens
//! - Strict refresh rotation: each refresh secret is single-use and is
//!   consumed atomically, so a replayed secret always fails
//! - Soft revocation: consumed and logged-out sessions stay in storage
//!   as an audit trail
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (platform crate)
//! - Refresh secrets stored only as SHA-256 hashes of 48 random bytes
//! - Token verification pinned to HS256 to reject algorithm confusion

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::{PgAdminRealm, PgCustomerRealm};
pub use presentation::router::{admin_auth_router, storefront_auth_router};
pub use token::{AccessClaims, TokenCodec, hash_opaque_secret, issue_opaque_secret};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
