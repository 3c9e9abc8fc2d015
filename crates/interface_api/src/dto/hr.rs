//! HR DTOs

use serde::Deserialize;

use domain_reporting::ReportType;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

impl ReportQuery {
    /// The requested report; monthly when no type is given
    pub fn report_type(&self) -> ReportType {
        self.report_type
            .as_deref()
            .map(ReportType::from_label)
            .unwrap_or_default()
    }
}
