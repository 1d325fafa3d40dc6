//! Customer Entity
//!
//! A storefront account created through self-service registration.
//! Administrators have no entity here: they are provisioned out of
//! band and only ever read back as a [`Principal`] projection.

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;
use platform::password::HashedPassword;

use crate::domain::principal::{LEVEL_CUSTOMER, Principal};
use crate::domain::value_object::Email;

#[derive(Debug, Clone)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Create a new active customer
    pub fn new(email: Email, password_hash: HashedPassword, full_name: String) -> Self {
        let now = Utc::now();
        Self {
            customer_id: CustomerId::new(),
            email,
            password_hash,
            full_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Project into the realm-neutral principal shape
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.customer_id.into_uuid(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            is_active: self.is_active,
            level: LEVEL_CUSTOMER.to_string(),
        }
    }
}
