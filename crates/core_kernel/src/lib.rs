//! Core Kernel - Foundational types for the claim management system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money types with precise decimal arithmetic
//! - Claim periods (calendar months) and month arithmetic
//! - Strongly-typed identifiers
//! - The port error type used at every storage boundary

pub mod money;
pub mod period;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use period::{ClaimPeriod, PeriodError};
pub use identifiers::{ClaimId, UserId, DocumentId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;

/// Time source injected into services so tests can pin "now"
pub use mockable::{Clock, DefaultClock};
