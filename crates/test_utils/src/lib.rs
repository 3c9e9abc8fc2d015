//! Test Utilities Crate
//!
//! Shared test infrastructure for the claim management test suite.
//!
//! # Modules
//!
//! - `fixtures`: fixed instants, clocks and the demo users
//! - `builders`: builders for claims and users in any lifecycle state
//! - `database`: PostgreSQL test containers with the schema applied
//! - `assertions`: assertion helpers for money and claim errors
//! - `generators`: proptest strategies for valid claim input

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
