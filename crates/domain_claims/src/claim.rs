//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, ClaimPeriod, Currency, Money, UserId};
use crate::document::SupportingDocument;
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Awaiting a decision
    Submitted,
    /// Approved for payment
    Approved,
    /// Rejected
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle actions, used in transition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimAction {
    Approve,
    Reject,
    MarkProcessed,
}

impl fmt::Display for ClaimAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ClaimAction::Approve => "approve",
            ClaimAction::Reject => "reject",
            ClaimAction::MarkProcessed => "mark as processed",
        };
        f.write_str(verb)
    }
}

/// Records the simulated payment of an approved claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStamp {
    pub paid_at: DateTime<Utc>,
    pub paid_by: String,
}

/// Result of marking a single claim as processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The claim was unpaid and is now processed
    Processed,
    /// The claim had already been processed; nothing changed
    AlreadyProcessed,
}

/// Every stored field of a claim, used by store adapters to rebuild one
#[derive(Debug, Clone)]
pub struct ClaimParts {
    pub id: ClaimId,
    pub lecturer_id: UserId,
    pub period: ClaimPeriod,
    pub hours_worked: Decimal,
    pub rate: Decimal,
    pub currency: Currency,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub payment: Option<PaymentStamp>,
    pub note: Option<String>,
    pub documents: Vec<SupportingDocument>,
}

/// A lecturer's claim for the hours worked in one month
///
/// Decision and payment fields are private: only the lifecycle methods below
/// change them. The total is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Submitting lecturer
    pub lecturer_id: UserId,
    /// Month claimed for
    pub period: ClaimPeriod,
    /// Hours worked in the period
    pub hours_worked: Decimal,
    /// Hourly rate
    pub rate: Decimal,
    /// Currency of the rate
    pub currency: Currency,
    status: ClaimStatus,
    /// When the claim was submitted
    pub submitted_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    processed_by: Option<String>,
    payment: Option<PaymentStamp>,
    /// Free-text note from the lecturer
    pub note: Option<String>,
    /// Supporting document metadata
    pub documents: Vec<SupportingDocument>,
}

impl Claim {
    /// Creates a claim in the Submitted state
    ///
    /// Inputs are assumed validated; see `ClaimSubmission::validate`.
    pub fn submitted(
        lecturer_id: UserId,
        period: ClaimPeriod,
        hours_worked: Decimal,
        rate: Decimal,
        currency: Currency,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ClaimId::new_v7(),
            lecturer_id,
            period,
            hours_worked,
            rate,
            currency,
            status: ClaimStatus::Submitted,
            submitted_at,
            processed_at: None,
            processed_by: None,
            payment: None,
            note: None,
            documents: Vec::new(),
        }
    }

    /// Rebuilds a stored claim, rejecting records that break the claim invariants
    pub fn from_parts(parts: ClaimParts) -> Result<Self, ClaimError> {
        let claim = Self {
            id: parts.id,
            lecturer_id: parts.lecturer_id,
            period: parts.period,
            hours_worked: parts.hours_worked,
            rate: parts.rate,
            currency: parts.currency,
            status: parts.status,
            submitted_at: parts.submitted_at,
            processed_at: parts.processed_at,
            processed_by: parts.processed_by,
            payment: parts.payment,
            note: parts.note,
            documents: parts.documents,
        };
        claim.check_invariants()?;
        Ok(claim)
    }

    /// `hours_worked × rate`, computed on every call
    pub fn total(&self) -> Money {
        Money::new(self.hours_worked * self.rate, self.currency)
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    /// When the approve/reject decision was made
    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Who made the approve/reject decision
    pub fn processed_by(&self) -> Option<&str> {
        self.processed_by.as_deref()
    }

    pub fn payment(&self) -> Option<&PaymentStamp> {
        self.payment.as_ref()
    }

    /// True once a payment run has processed this claim
    pub fn is_paid(&self) -> bool {
        self.payment.is_some()
    }

    /// True for approved claims still waiting for a payment run
    pub fn is_awaiting_payment(&self) -> bool {
        self.status == ClaimStatus::Approved && self.payment.is_none()
    }

    /// Submitted -> Approved
    pub fn approve(&mut self, actor_name: &str, at: DateTime<Utc>) -> Result<(), ClaimError> {
        self.decide(ClaimAction::Approve, ClaimStatus::Approved, actor_name, at)
    }

    /// Submitted -> Rejected
    pub fn reject(&mut self, actor_name: &str, at: DateTime<Utc>) -> Result<(), ClaimError> {
        self.decide(ClaimAction::Reject, ClaimStatus::Rejected, actor_name, at)
    }

    /// Approved -> Approved + paid
    ///
    /// Repeating this on a paid claim changes nothing.
    pub fn mark_paid(
        &mut self,
        actor_name: &str,
        at: DateTime<Utc>,
    ) -> Result<PaymentOutcome, ClaimError> {
        if self.status != ClaimStatus::Approved {
            return Err(ClaimError::InvalidTransition {
                from: self.status,
                action: ClaimAction::MarkProcessed,
            });
        }
        if self.payment.is_some() {
            return Ok(PaymentOutcome::AlreadyProcessed);
        }
        self.payment = Some(PaymentStamp {
            paid_at: at,
            paid_by: actor_name.to_string(),
        });
        Ok(PaymentOutcome::Processed)
    }

    fn decide(
        &mut self,
        action: ClaimAction,
        target: ClaimStatus,
        actor_name: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        if self.status != ClaimStatus::Submitted {
            return Err(ClaimError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        self.status = target;
        self.processed_at = Some(at);
        self.processed_by = Some(actor_name.to_string());
        Ok(())
    }

    fn check_invariants(&self) -> Result<(), ClaimError> {
        if self.hours_worked <= Decimal::ZERO || self.rate <= Decimal::ZERO {
            return Err(ClaimError::Inconsistent(format!(
                "{}: hours and rate must be positive",
                self.id
            )));
        }
        let decided = self.status != ClaimStatus::Submitted;
        if decided != self.processed_at.is_some() || decided != self.processed_by.is_some() {
            return Err(ClaimError::Inconsistent(format!(
                "{}: decision stamp does not match status {}",
                self.id, self.status
            )));
        }
        if self.payment.is_some() && self.status != ClaimStatus::Approved {
            return Err(ClaimError::Inconsistent(format!(
                "{}: only approved claims can be paid",
                self.id
            )));
        }
        Ok(())
    }
}
