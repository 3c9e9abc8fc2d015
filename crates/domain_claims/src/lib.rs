//! Claims Domain
//!
//! Lecturers claim the hours they worked in a calendar month at an hourly
//! rate. Coordinators and managers decide each claim once; HR later runs a
//! simulated payment over the approved ones.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Approved/Rejected
//! Approved  -> Approved + paid (payment run)
//! ```
//!
//! The claim total is always `hours_worked × rate` and is never stored.

pub mod claim;
pub mod document;
pub mod submission;
pub mod lifecycle;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimAction, ClaimParts, ClaimStatus, PaymentOutcome, PaymentStamp};
pub use document::{NewDocument, SupportingDocument, MAX_DOCUMENTS_PER_CLAIM};
pub use submission::{ClaimSubmission, SubmissionRules, MAX_NOTE_LEN};
pub use lifecycle::{ClaimCounts, LifecycleEngine, PaymentRunSummary, PAYMENT_ACTOR_FALLBACK};
pub use ports::{ClaimOrder, ClaimQuery, ClaimStore};
pub use ports::memory::InMemoryClaimStore;
pub use error::{ClaimError, ValidationErrors};
