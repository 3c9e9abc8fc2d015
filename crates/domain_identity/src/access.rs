//! Access gate
//!
//! Maps roles to the actions they may invoke through a fixed table.

use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::UserId;
use crate::error::AccessError;
use crate::role::Role;

/// Actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Submit a monthly claim
    SubmitClaim,
    /// View one's own claim history
    ViewOwnClaims,
    /// Approve or reject submitted claims
    ReviewClaims,
    /// View the HR dashboard
    ViewDashboard,
    /// Generate and export reports
    GenerateReports,
    /// Run the payment simulation
    ProcessPayments,
}

impl Capability {
    /// Roles granted this capability
    pub fn granted_to(&self) -> &'static [Role] {
        match self {
            Capability::SubmitClaim | Capability::ViewOwnClaims => &[Role::Lecturer],
            Capability::ReviewClaims => &[Role::Coordinator, Role::Manager],
            Capability::ViewDashboard
            | Capability::GenerateReports
            | Capability::ProcessPayments => &[Role::Manager, Role::Hr],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::SubmitClaim => "submit claims",
            Capability::ViewOwnClaims => "view own claims",
            Capability::ReviewClaims => "review claims",
            Capability::ViewDashboard => "view the HR dashboard",
            Capability::GenerateReports => "generate reports",
            Capability::ProcessPayments => "process payments",
        };
        f.write_str(name)
    }
}

impl Role {
    /// Returns true if this role holds the capability
    pub fn can(&self, capability: Capability) -> bool {
        capability.granted_to().contains(self)
    }

    /// Shorthand for HR/Manager actions
    pub fn may_perform_hr_action(&self) -> bool {
        matches!(self, Role::Manager | Role::Hr)
    }

    /// Shorthand for lecturer actions
    pub fn may_perform_lecturer_action(&self) -> bool {
        matches!(self, Role::Lecturer)
    }
}

/// The authenticated caller of an operation
///
/// Passed explicitly into every engine call that records who acted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    /// Name recorded on the claims this actor processes
    pub fn recorded_name(&self, fallback: &str) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            fallback.to_string()
        } else {
            name.to_string()
        }
    }
}

/// Checks that the actor's role holds the capability
pub fn authorize(actor: &Actor, capability: Capability) -> Result<(), AccessError> {
    if actor.role.can(capability) {
        Ok(())
    } else {
        tracing::warn!(
            user = %actor.user_id,
            role = %actor.role,
            %capability,
            "Access denied"
        );
        Err(AccessError::Forbidden {
            role: actor.role,
            capability,
        })
    }
}
