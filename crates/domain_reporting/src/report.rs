//! Report datasets
//!
//! The row schema here is the whole contract between the aggregation engine
//! and any exporter: six columns, in the order of [`COLUMNS`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use core_kernel::{ClaimId, ClaimPeriod, Money};
use domain_claims::ClaimStatus;

/// Column headers, in export order
pub const COLUMNS: [&str; 6] = ["Period", "Lecturer", "Department", "Hours", "Amount", "Status"];

/// Department shown until claims carry a real one
pub const PLACEHOLDER_DEPARTMENT: &str = "IT";

/// Lecturer name shown when the submitting user cannot be found
pub const UNKNOWN_LECTURER: &str = "Unknown";

/// Which claims a report covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportType {
    /// Claims whose period is the current calendar month
    #[default]
    Monthly,
    /// Claims still awaiting a decision, whatever their period
    Pending,
    /// Every claim; keeps the label it was requested with
    All(String),
}

impl ReportType {
    /// Parses a request label
    ///
    /// Only the exact labels `monthly` and `pending` are recognised; any other
    /// label, including a differently-cased one, selects every claim and is
    /// kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label {
            "monthly" => ReportType::Monthly,
            "pending" => ReportType::Pending,
            other => ReportType::All(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReportType::Monthly => "monthly",
            ReportType::Pending => "pending",
            ReportType::All(label) => label,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ReportType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One claim in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub claim_id: ClaimId,
    pub period: ClaimPeriod,
    pub lecturer: String,
    pub department: String,
    pub hours: Decimal,
    /// The claim's own total, whatever its status
    pub amount: Money,
    pub status: ClaimStatus,
    #[serde(skip)]
    pub submitted_at: DateTime<Utc>,
}

/// A report: rows newest-submitted first, plus a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportData {
    pub report_type: ReportType,
    pub generated_at: DateTime<Utc>,
    /// Sum over Approved rows only
    pub total_amount: Money,
    pub total_claims: usize,
    pub rows: Vec<ReportRow>,
}

impl ReportData {
    /// A report with no rows
    pub fn empty(report_type: ReportType, generated_at: DateTime<Utc>, total_amount: Money) -> Self {
        Self {
            report_type,
            generated_at,
            total_amount,
            total_claims: 0,
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_labels() {
        assert_eq!(ReportType::from_label("monthly"), ReportType::Monthly);
        assert_eq!(ReportType::from_label("pending"), ReportType::Pending);
        assert_eq!(
            ReportType::from_label("PENDING"),
            ReportType::All("PENDING".to_string())
        );
        assert_eq!(ReportType::from_label(" monthly ").label(), " monthly ");
        assert_eq!(
            ReportType::from_label("annual"),
            ReportType::All("annual".to_string())
        );
        assert_eq!(ReportType::from_label("annual").label(), "annual");
    }

    #[test]
    fn test_columns_order() {
        assert_eq!(COLUMNS.join(","), "Period,Lecturer,Department,Hours,Amount,Status");
    }
}
