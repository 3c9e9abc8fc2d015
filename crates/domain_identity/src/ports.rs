//! Identity domain ports
//!
//! `UserDirectory` is everything the rest of the system needs from user
//! storage. The PostgreSQL adapter lives in `infra_db`; the in-memory
//! adapter below backs tests and the database-less development server.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, UserId};

use crate::role::Role;
use crate::user::User;

/// Query parameters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Filter by role
    pub role: Option<Role>,
    /// Filter by active flag
    pub is_active: Option<bool>,
}

impl UserQuery {
    /// All users holding a role, active or not
    pub fn by_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Active users holding a role
    pub fn active(role: Role) -> Self {
        Self {
            role: Some(role),
            is_active: Some(true),
        }
    }

    /// Returns true if the user satisfies every set filter
    pub fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |role| user.role == role)
            && self.is_active.map_or(true, |active| user.is_active == active)
    }
}

/// Storage port for users
#[async_trait]
pub trait UserDirectory: DomainPort + HealthCheckable {
    /// Retrieves a user by ID, or `PortError::NotFound`
    async fn get_user(&self, id: UserId) -> Result<User, PortError>;

    /// Finds a user by (case-insensitive) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError>;

    /// Lists users matching the query, ordered by name
    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, PortError>;

    /// Inserts a user; fails with `PortError::Conflict` on duplicate email
    async fn insert_user(&self, user: &User) -> Result<(), PortError>;

    /// Counts users matching the query
    async fn count_users(&self, query: UserQuery) -> Result<u64, PortError> {
        Ok(self.list_users(query).await?.len() as u64)
    }
}

pub mod memory {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of `UserDirectory`
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryUserDirectory {
        users: Arc<RwLock<HashMap<UserId, User>>>,
    }

    impl InMemoryUserDirectory {
        /// Creates an empty directory
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with users
        pub async fn with_users(users: Vec<User>) -> Self {
            let directory = Self::new();
            {
                let mut map = directory.users.write().await;
                for user in users {
                    map.insert(user.id, user);
                }
            }
            directory
        }
    }

    impl DomainPort for InMemoryUserDirectory {}

    #[async_trait]
    impl HealthCheckable for InMemoryUserDirectory {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("memory-user-directory")
        }
    }

    #[async_trait]
    impl UserDirectory for InMemoryUserDirectory {
        async fn get_user(&self, id: UserId) -> Result<User, PortError> {
            self.users
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", id))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
            let email = email.trim();
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, PortError> {
            let mut users: Vec<User> = self
                .users
                .read()
                .await
                .values()
                .filter(|u| query.matches(u))
                .cloned()
                .collect();
            users.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(users)
        }

        async fn insert_user(&self, user: &User) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                return Err(PortError::conflict(format!(
                    "User with email '{}' already exists",
                    user.email
                )));
            }
            users.insert(user.id, user.clone());
            Ok(())
        }
    }
}
