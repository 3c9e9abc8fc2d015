//! Identity Domain
//!
//! Users of the claim management system and what each of them may do.
//!
//! # Roles
//!
//! Every user holds exactly one [`Role`]:
//!
//! - **Lecturer**: submits monthly hour claims and views their own history
//! - **Coordinator**: reviews submitted claims (approve / reject)
//! - **Manager**: reviews claims and has HR access
//! - **HR**: dashboards, reports, exports and payment runs
//!
//! Access decisions go through [`access::authorize`], a static
//! role-membership check against a closed set of [`Capability`] values.
//!
//! # Example
//!
//! ```rust
//! use domain_identity::{Actor, Capability, Role, access};
//! use core_kernel::UserId;
//!
//! let actor = Actor::new(UserId::new(), "Mike Manager", Role::Manager);
//! assert!(access::authorize(&actor, Capability::ProcessPayments).is_ok());
//! assert!(access::authorize(&actor, Capability::SubmitClaim).is_err());
//! ```

pub mod role;
pub mod user;
pub mod access;
pub mod credentials;
pub mod ports;
pub mod error;

pub use role::{Role, UnknownRole};
pub use user::{User, NewUser};
pub use access::{authorize, Actor, Capability};
pub use credentials::{hash_password, verify_password};
pub use ports::{UserDirectory, UserQuery};
pub use ports::memory::InMemoryUserDirectory;
pub use error::{AccessError, CredentialError};
