//! Demo users
//!
//! One user per role, seeded into an empty directory when
//! `CMCS_SEED_DEMO_USERS` is set.

use chrono::{DateTime, Utc};
use tracing::info;

use core_kernel::PortError;
use domain_identity::{hash_password, NewUser, Role, UserDirectory, UserQuery};

/// Password given to every demo user
pub const DEMO_PASSWORD: &str = "password";

const DEMO_USERS: [(&str, &str, Role); 4] = [
    ("John Lecturer", "lecturer@cmcs.com", Role::Lecturer),
    ("Sarah Coordinator", "coordinator@cmcs.com", Role::Coordinator),
    ("Mike Manager", "manager@cmcs.com", Role::Manager),
    ("Thandi HR", "hr@cmcs.com", Role::Hr),
];

/// Inserts the demo users unless the directory already has users
///
/// Returns how many users were inserted.
pub async fn seed_demo_users(
    users: &dyn UserDirectory,
    now: DateTime<Utc>,
) -> Result<usize, PortError> {
    if users.count_users(UserQuery::default()).await? > 0 {
        info!("User directory not empty, skipping demo users");
        return Ok(0);
    }

    for (name, email, role) in DEMO_USERS {
        let password_hash =
            hash_password(DEMO_PASSWORD).map_err(|e| PortError::internal(e.to_string()))?;
        let user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            phone_number: None,
        }
        .into_user(now);
        users.insert_user(&user).await?;
    }

    info!(count = DEMO_USERS.len(), "Seeded demo users");
    Ok(DEMO_USERS.len())
}
