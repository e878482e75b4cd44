use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::metadata::{FilingMetadata, UNKNOWN};
use crate::parser::TwoLSummary;

pub const SHEET_NAME: &str = "2l Summary";
pub const XLSX_FILE_NAME: &str = "2l_summary.xlsx";
pub const CSV_FILE_NAME: &str = "2l_summary.csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const ERROR: &str = "Error";

pub const COLUMNS: [&str; 12] = [
    "Link",
    "Symbol",
    "Company",
    "Sector",
    "Date",
    "Announcement Type",
    "Key Pointers",
    "Summary",
    "Final Summary",
    "Explain Like 5",
    "One Word",
    "Good/Bad",
];

/// One output row per input link.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportRow {
    pub link: String,
    pub symbol: String,
    pub company: String,
    pub sector: String,
    pub date: String,
    pub announcement_type: String,
    pub key_pointers: String,
    pub summary: String,
    pub final_summary: String,
    pub explain_like_five: String,
    pub one_word: String,
    pub good_or_bad: String,
}

impl ReportRow {
    pub fn new(link: &str, metadata: FilingMetadata, summary: TwoLSummary) -> Self {
        let [key_pointers, summary, final_summary, explain_like_five, one_word, good_or_bad] =
            summary.into_values();
        Self {
            link: link.to_string(),
            symbol: metadata.symbol,
            company: metadata.company,
            sector: metadata.sector,
            date: metadata.date,
            announcement_type: metadata.announcement_type,
            key_pointers,
            summary,
            final_summary,
            explain_like_five,
            one_word,
            good_or_bad,
        }
    }

    /// Row for a link whose document could not be fetched.
    pub fn error(link: &str) -> Self {
        let metadata = FilingMetadata {
            symbol: UNKNOWN.to_string(),
            company: UNKNOWN.to_string(),
            sector: UNKNOWN.to_string(),
            date: ERROR.to_string(),
            announcement_type: ERROR.to_string(),
        };
        Self::new(link, metadata, TwoLSummary::filled(ERROR))
    }

    /// Cell values in `COLUMNS` order.
    pub fn values(&self) -> [&str; 12] {
        [
            &self.link,
            &self.symbol,
            &self.company,
            &self.sector,
            &self.date,
            &self.announcement_type,
            &self.key_pointers,
            &self.summary,
            &self.final_summary,
            &self.explain_like_five,
            &self.one_word,
            &self.good_or_bad,
        ]
    }
}

pub fn write_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, value) in row.values().iter().enumerate() {
            sheet.write_string(excel_row, col as u16, *value)?;
        }
    }

    let buffer = workbook.save_to_buffer()?;
    tracing::info!("Wrote {} rows to xlsx ({} bytes)", rows.len(), buffer.len());
    Ok(buffer)
}

pub fn write_csv(rows: &[ReportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(COLUMNS)
        .map_err(|e| AppError::ExportError(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row.values())
            .map_err(|e| AppError::ExportError(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(e.to_string()))
}
