use csv::ReaderBuilder;

use crate::error::AppError;

pub const LINK_COLUMN: &str = "link";

/// Read the `link` column of an uploaded CSV, one entry per data row.
/// Blank or missing cells stay in place as empty strings.
pub fn read_links(data: &[u8]) -> Result<Vec<String>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == LINK_COLUMN)
        .ok_or_else(|| AppError::MissingLinkColumn("CSV must contain a 'link' column.".to_string()))?;

    let mut links = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let link = record.get(column).unwrap_or_default();
        if link.is_empty() {
            tracing::warn!("Row {} has an empty link", row + 1);
        }
        links.push(link.to_string());
    }

    tracing::info!("Read {} links from upload", links.len());
    Ok(links)
}
