//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter translates
//! between domain values and repository row types and maps
//! `DatabaseError` into `PortError`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresClaimStore, PostgresUserDirectory};
//!
//! let claims = PostgresClaimStore::new(pool.clone());
//! let users = PostgresUserDirectory::new(pool);
//! ```

pub mod claims;
pub mod users;

pub use claims::PostgresClaimStore;
pub use users::PostgresUserDirectory;
