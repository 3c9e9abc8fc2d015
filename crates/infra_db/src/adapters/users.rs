//! PostgreSQL User Directory Adapter

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId,
};
use domain_identity::{Role, User, UserDirectory, UserQuery};

use crate::repositories::users::{UserFilter, UserRepository, UserRole, UserRow};

/// PostgreSQL-backed implementation of `UserDirectory`
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    repository: UserRepository,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresUserDirectory {}

#[async_trait]
impl HealthCheckable for PostgresUserDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.repository.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };
        HealthCheckResult {
            adapter_id: "postgres-user-directory".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_user(&self, id: UserId) -> Result<User, PortError> {
        Ok(row_to_user(self.repository.get_by_id(*id.as_uuid()).await?))
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PortError> {
        Ok(self.repository.find_by_email(email).await?.map(row_to_user))
    }

    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, PortError> {
        let rows = self.repository.list(&query_to_filter(&query)).await?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert_user(&self, user: &User) -> Result<(), PortError> {
        Ok(self.repository.insert(&user_to_row(user)).await?)
    }

    async fn count_users(&self, query: UserQuery) -> Result<u64, PortError> {
        let count = self.repository.count(&query_to_filter(&query)).await?;
        Ok(count.max(0) as u64)
    }
}

fn query_to_filter(query: &UserQuery) -> UserFilter {
    UserFilter {
        role: query.role.map(role_to_db),
        is_active: query.is_active,
    }
}

fn role_to_db(role: Role) -> UserRole {
    match role {
        Role::Lecturer => UserRole::Lecturer,
        Role::Coordinator => UserRole::Coordinator,
        Role::Manager => UserRole::Manager,
        Role::Hr => UserRole::Hr,
    }
}

fn role_from_db(role: UserRole) -> Role {
    match role {
        UserRole::Lecturer => Role::Lecturer,
        UserRole::Coordinator => Role::Coordinator,
        UserRole::Manager => Role::Manager,
        UserRole::Hr => Role::Hr,
    }
}

fn user_to_row(user: &User) -> UserRow {
    UserRow {
        user_id: *user.id.as_uuid(),
        name: user.name.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        role: role_to_db(user.role),
        phone_number: user.phone_number.clone(),
        registered_at: user.registered_at,
        is_active: user.is_active,
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from_uuid(row.user_id),
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        role: role_from_db(row.role),
        phone_number: row.phone_number,
        registered_at: row.registered_at,
        is_active: row.is_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_round_trip() {
        for role in Role::ALL {
            assert_eq!(role_from_db(role_to_db(role)), role);
        }
    }

    #[test]
    fn test_active_lecturer_filter() {
        let filter = query_to_filter(&UserQuery::active(Role::Lecturer));
        assert_eq!(filter.role, Some(UserRole::Lecturer));
        assert_eq!(filter.is_active, Some(true));
    }
}
