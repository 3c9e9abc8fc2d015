//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the claim management system using SQLx.
//!
//! # Architecture
//!
//! - `repositories` own the SQL and work in row types
//! - `adapters` implement `ClaimStore` and `UserDirectory` over them
//! - `migrations/` holds the schema, embedded and applied by
//!   [`run_migrations`]
//!
//! Payment runs update every claim of the batch inside one transaction.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/cmcs")).await?;
//! run_migrations(&pool).await?;
//! let claims = PostgresClaimStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{PostgresClaimStore, PostgresUserDirectory};
