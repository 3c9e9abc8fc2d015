//! Users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;
use crate::role::Role;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Full name
    pub name: String,
    /// Login email, unique across users
    pub email: String,
    /// Argon2 PHC string; never the plaintext password
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Role
    pub role: Role,
    /// Optional phone number
    pub phone_number: Option<String>,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
    /// Inactive users cannot log in and are not counted as lecturers
    pub is_active: bool,
}

impl User {
    /// Name with role, e.g. `Sarah Coordinator (Coordinator)`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }

    /// Returns true for active users holding the given role
    pub fn is_active_in(&self, role: Role) -> bool {
        self.is_active && self.role == role
    }
}

/// Data for registering a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Materializes the user with a fresh identifier
    pub fn into_user(self, registered_at: DateTime<Utc>) -> User {
        User {
            id: UserId::new_v7(),
            name: self.name,
            email: self.email.trim().to_ascii_lowercase(),
            password_hash: self.password_hash,
            role: self.role,
            phone_number: self.phone_number,
            registered_at,
            is_active: true,
        }
    }
}
