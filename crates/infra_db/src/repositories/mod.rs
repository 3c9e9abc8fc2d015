//! Repository implementations
//!
//! Repositories own the SQL and speak in row types; the adapters in
//! `crate::adapters` translate rows to and from domain values.

pub mod claims;
pub mod users;

pub use claims::ClaimRepository;
pub use users::UserRepository;
