//! Claim submission rules
//!
//! A submission is checked in full before anything is stored; every failed
//! rule contributes one message to the resulting `ValidationErrors`.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::document::{NewDocument, MAX_DOCUMENTS_PER_CLAIM};
use crate::error::ValidationErrors;

/// Longest note a lecturer may attach
pub const MAX_NOTE_LEN: usize = 500;

/// Input for a new claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    /// Any date in the month claimed for
    pub period: NaiveDate,
    pub hours_worked: Decimal,
    pub rate: Decimal,
    pub note: Option<String>,
    #[serde(default)]
    pub documents: Vec<NewDocument>,
}

impl ClaimSubmission {
    pub fn new(period: NaiveDate, hours_worked: Decimal, rate: Decimal) -> Self {
        Self {
            period,
            hours_worked,
            rate,
            note: None,
            documents: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_document(mut self, document: NewDocument) -> Self {
        self.documents.push(document);
        self
    }
}

/// Bounds applied to submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRules {
    /// Upper bound on hours per month (inclusive)
    pub max_hours: Decimal,
    /// Upper bound on the hourly rate (inclusive)
    pub max_rate: Decimal,
    /// How many calendar months back a period may lie
    pub max_age_months: u32,
    /// Decimal places accepted for hours and rate
    pub max_scale: u32,
}

impl Default for SubmissionRules {
    fn default() -> Self {
        Self {
            max_hours: dec!(200),
            max_rate: dec!(500),
            max_age_months: 3,
            max_scale: 2,
        }
    }
}

impl SubmissionRules {
    /// Validates a submission against `today`
    pub fn validate(&self, submission: &ClaimSubmission, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let hours = submission.hours_worked;
        if hours <= Decimal::ZERO {
            errors.push("Hours worked must be greater than 0");
        } else if hours > self.max_hours {
            errors.push(format!("Hours worked cannot exceed {} per month", self.max_hours));
        }
        if hours.normalize().scale() > self.max_scale {
            errors.push(format!(
                "Hours worked allows at most {} decimal places",
                self.max_scale
            ));
        }

        let rate = submission.rate;
        if rate <= Decimal::ZERO {
            errors.push("Hourly rate must be greater than 0");
        } else if rate > self.max_rate {
            errors.push(format!("Hourly rate cannot exceed R{}", self.max_rate));
        }
        if rate.normalize().scale() > self.max_scale {
            errors.push(format!(
                "Hourly rate allows at most {} decimal places",
                self.max_scale
            ));
        }

        if submission.period > today {
            errors.push("Claim period cannot be in the future");
        } else {
            let earliest = today.checked_sub_months(Months::new(self.max_age_months));
            if earliest.map_or(true, |earliest| submission.period < earliest) {
                errors.push(format!(
                    "Claims older than {} months are not accepted",
                    self.max_age_months
                ));
            }
        }

        if submission
            .note
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_NOTE_LEN)
        {
            errors.push(format!("Note cannot exceed {MAX_NOTE_LEN} characters"));
        }

        if submission.documents.len() > MAX_DOCUMENTS_PER_CLAIM {
            errors.push(format!(
                "Maximum {MAX_DOCUMENTS_PER_CLAIM} supporting documents allowed"
            ));
        }
        for problem in submission.documents.iter().flat_map(NewDocument::problems) {
            errors.push(problem);
        }

        errors.into_result()
    }
}
