//! Identity domain errors

use thiserror::Error;

use crate::access::Capability;
use crate::role::Role;

/// Access gate rejections
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Role {role} may not {capability}")]
    Forbidden { role: Role, capability: Capability },
}

/// Password hashing and verification failures
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Email unknown, password wrong, or account inactive
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
