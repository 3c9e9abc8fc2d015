//! Reporting domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// A read-side failure while aggregating
///
/// Never returned to callers of the aggregation engine: the engine logs it
/// and answers with an empty or zero result instead.
#[derive(Debug, Error)]
pub enum AggregationFault {
    #[error("{operation}: store read failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: PortError,
    },

    #[error("{operation}: {source}")]
    Money {
        operation: &'static str,
        #[source]
        source: MoneyError,
    },
}

impl AggregationFault {
    pub fn store(operation: &'static str) -> impl FnOnce(PortError) -> Self {
        move |source| AggregationFault::Store { operation, source }
    }

    pub fn money(operation: &'static str) -> impl FnOnce(MoneyError) -> Self {
        move |source| AggregationFault::Money { operation, source }
    }
}

/// Errors raised while writing a report spreadsheet
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Report has too many rows for one worksheet: {0}")]
    TooManyRows(usize),
}
