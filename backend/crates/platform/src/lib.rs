//! Platform - Cross-domain security primitives
//!
//! Shared building blocks that carry no domain knowledge:
//! - `password`: Argon2id hashing and verification for user-chosen secrets
//! - `crypto`: CSPRNG bytes and fast one-way hashing for machine secrets

pub mod crypto;
pub mod password;
