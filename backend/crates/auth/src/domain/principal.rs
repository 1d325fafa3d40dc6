//! Principal Projection
//!
//! Realm-neutral view of an authenticatable account. Both administrator
//! and customer realms project their rows into this shape, which is all
//! the session use cases need: credentials, liveness and a level code.

use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::value_object::Email;

/// Level code embedded in storefront access tokens
///
/// Customers have no level hierarchy; every customer token carries
/// this fixed code.
pub const LEVEL_CUSTOMER: &str = "customer";

/// An account capable of holding a session
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub is_active: bool,
    /// Level code stamped into access-token claims
    pub level: String,
}
