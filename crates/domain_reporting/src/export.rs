//! Report exporter
//!
//! Writes a [`ReportData`] to an xlsx workbook: a merged title row, a bold
//! header row on a light-blue fill, then one row per claim.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, Workbook};
use tracing::info;

use crate::error::ExportError;
use crate::report::{ReportData, COLUMNS};

/// MIME type of the exported workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;
const TITLE_LAST_COL: u16 = 4;
const MAX_ROWS: u32 = 1_048_576;
const LIGHT_BLUE: u32 = 0xADD8E6;

/// `CMCS_Report_<type>_<yyyyMMdd>.xlsx`
///
/// Characters outside `[A-Za-z0-9_-]` in the type label become `_`.
pub fn file_name(report_type: &str, date: NaiveDate) -> String {
    let label: String = report_type
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("CMCS_Report_{}_{}.xlsx", label, date.format("%Y%m%d"))
}

/// Renders the report as an xlsx workbook in memory
pub fn to_xlsx(report: &ReportData) -> Result<Vec<u8>, ExportError> {
    let last_row = FIRST_DATA_ROW as usize + report.rows.len();
    if last_row > MAX_ROWS as usize {
        return Err(ExportError::TooManyRows(report.rows.len()));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Report")?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let title = format!("CMCS {} Report", report.report_type.label().to_uppercase());
    sheet.merge_range(TITLE_ROW, 0, TITLE_ROW, TITLE_LAST_COL, &title, &title_format)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(LIGHT_BLUE));
    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(HEADER_ROW, col as u16, *header, &header_format)?;
    }

    let amount_format = Format::new().set_num_format("#,##0.00");
    for (offset, row) in report.rows.iter().enumerate() {
        let r = FIRST_DATA_ROW + offset as u32;
        sheet.write_string(r, 0, row.period.long_label())?;
        sheet.write_string(r, 1, &row.lecturer)?;
        sheet.write_string(r, 2, &row.department)?;
        sheet.write_number(r, 3, row.hours.to_f64().unwrap_or_default())?;
        sheet.write_number_with_format(
            r,
            4,
            row.amount.amount().to_f64().unwrap_or_default(),
            &amount_format,
        )?;
        sheet.write_string(r, 5, row.status.as_str())?;
    }

    sheet.autofit();

    let buffer = workbook.save_to_buffer()?;
    info!(
        report_type = %report.report_type,
        rows = report.rows.len(),
        bytes = buffer.len(),
        "Report exported"
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(file_name("monthly", date), "CMCS_Report_monthly_20261005.xlsx");
        assert_eq!(file_name("a/b c", date), "CMCS_Report_a_b_c_20261005.xlsx");
    }
}
