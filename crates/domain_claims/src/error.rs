//! Claims domain errors

use std::fmt;
use thiserror::Error;

use core_kernel::{ClaimId, MoneyError, PortError};
use domain_identity::AccessError;
use crate::claim::{ClaimAction, ClaimStatus};

/// One human-readable message per failed submission rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Returns true if any message contains `fragment`
    pub fn mentions(&self, fragment: &str) -> bool {
        self.0.iter().any(|m| m.contains(fragment))
    }

    /// `Ok(())` when no rule failed
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid claim: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Claim not found: {0}")]
    NotFound(ClaimId),

    #[error("Cannot {action} a claim that is {from}")]
    InvalidTransition { from: ClaimStatus, action: ClaimAction },

    #[error(transparent)]
    Forbidden(#[from] AccessError),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Stored claim is inconsistent: {0}")]
    Inconsistent(String),

    #[error("Claim store error: {0}")]
    Store(#[from] PortError),
}

impl ClaimError {
    /// Maps a store lookup failure, turning NotFound into `ClaimError::NotFound`
    pub fn from_lookup(id: ClaimId, error: PortError) -> Self {
        if error.is_not_found() {
            ClaimError::NotFound(id)
        } else {
            ClaimError::Store(error)
        }
    }
}
