//! Reporting Domain
//!
//! Read-side views over claims for the HR dashboard:
//!
//! - headline statistics (active lecturers, pending claims, this month's
//!   payout, approval rate)
//! - a monthly payout trend and a per-lecturer ranking
//! - report datasets (`monthly`, `pending`, everything else) and their
//!   xlsx export
//!
//! The [`AggregationEngine`] never fails: a store fault is logged and the
//! caller receives an empty or zero result.

pub mod aggregation;
pub mod report;
pub mod export;
pub mod error;

pub use aggregation::{
    AggregationEngine, DashboardStatistics, DepartmentShare, LecturerTotal, TrendPoint,
    DEFAULT_PERFORMANCE_LIMIT, DEFAULT_TREND_MONTHS,
};
pub use report::{ReportData, ReportRow, ReportType, COLUMNS};
pub use export::{file_name, to_xlsx, XLSX_CONTENT_TYPE};
pub use error::{AggregationFault, ExportError};
