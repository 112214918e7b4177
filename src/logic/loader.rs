//! CSV input loader

use crate::logic::AnalysisError;
use crate::models::EventTable;

const UTF8_BOM: char = '\u{feff}';

/// Parse an uploaded CSV body into a header + rows table.
/// Rows whose field count differs from the header are rejected.
pub fn load_csv(data: &[u8]) -> Result<EventTable, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AnalysisError::EmptyInput);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!("Loaded CSV: {} columns, {} rows", headers.len(), rows.len());

    Ok(EventTable::new(headers, rows))
}
