//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Each realm (admin, customer) provides its own implementation over its
//! own tables; the session use cases stay generic over these traits.

use uuid::Uuid;

use crate::domain::entity::{Customer, RefreshSession};
use crate::domain::principal::Principal;
use crate::domain::value_object::Email;
use crate::error::AuthResult;
use kernel::id::SessionId;

/// Principal lookup within one realm
#[trait_variant::make(PrincipalRepository: Send)]
pub trait LocalPrincipalRepository {
    /// Find a principal by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>>;

    /// Find a principal by id
    async fn find_by_id(&self, principal_id: Uuid) -> AuthResult<Option<Principal>>;
}

/// Refresh session persistence within one realm
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Persist a newly opened session
    async fn create(&self, session: &RefreshSession) -> AuthResult<()>;

    /// Look up a session by refresh secret hash
    async fn find_by_refresh_hash(&self, hash: &str) -> AuthResult<Option<RefreshSession>>;

    /// Atomically claim a session for rotation
    ///
    /// Returns `true` if this caller flipped `revoked` from false to
    /// true. Under concurrent refreshes of the same secret exactly one
    /// caller sees `true`; everyone else must treat the secret as
    /// revoked.
    async fn consume(&self, session_id: SessionId) -> AuthResult<bool>;

    /// Revoke every live session matching a refresh secret hash
    ///
    /// Returns the number of sessions revoked (0 when the hash is
    /// unknown or already revoked).
    async fn revoke_by_refresh_hash(&self, hash: &str) -> AuthResult<u64>;
}

/// Customer account creation (storefront realm only)
#[trait_variant::make(CustomerRegistry: Send)]
pub trait LocalCustomerRegistry {
    /// Persist a new customer account
    ///
    /// Email uniqueness is ultimately enforced here, not by
    /// [`Self::email_exists`]: a concurrent registration can pass the
    /// exists check and still collide on insert, which implementations
    /// report as `EmailTaken`.
    async fn create_customer(&self, customer: &Customer) -> AuthResult<()>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &Email) -> AuthResult<bool>;
}
