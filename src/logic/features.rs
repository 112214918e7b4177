//! Feature derivation
//!
//! Parses the timestamp of every row, extracts hour-of-day and reads the
//! coordinates, producing one `EventRecord` per row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::logic::AnalysisError;
use crate::models::{EventRecord, EventTable, RequiredColumns, LATITUDE_COLUMN, LONGITUDE_COLUMN};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse an ISO-style timestamp.
///
/// Values carrying an offset keep their wall-clock time in that offset.
/// Bare dates resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Parse a coordinate in degrees; `|value| <= limit`
fn parse_coordinate(raw: &str, row: usize, column: &str, limit: f64) -> Result<f64, AnalysisError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| AnalysisError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Derive one record per table row. Row numbers in errors are 1-based.
pub fn derive(table: &EventTable, columns: RequiredColumns) -> Result<Vec<EventRecord>, AnalysisError> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| -> Result<EventRecord, AnalysisError> {
            let row = i + 1;
            let raw_ts = &cells[columns.timestamp];
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| AnalysisError::InvalidTimestamp {
                row,
                value: raw_ts.clone(),
            })?;

            Ok(EventRecord {
                timestamp,
                latitude: parse_coordinate(&cells[columns.latitude], row, LATITUDE_COLUMN, MAX_LATITUDE)?,
                longitude: parse_coordinate(&cells[columns.longitude], row, LONGITUDE_COLUMN, MAX_LONGITUDE)?,
                hour: timestamp.hour(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour_of(s: &str) -> u32 {
        parse_timestamp(s).unwrap().hour()
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(hour_of("2024-03-05 14:22:10"), 14);
        assert_eq!(hour_of("2024-03-05T14:22:10"), 14);
        assert_eq!(hour_of("2024-03-05T14:22:10.123"), 14);
        assert_eq!(hour_of("2024-03-05 14:22"), 14);
        assert_eq!(hour_of("2024/03/05 14:22:10"), 14);
        assert_eq!(hour_of("2024-03-05"), 0);
    }

    #[test]
    fn test_offset_keeps_wall_clock_hour() {
        assert_eq!(hour_of("2024-03-05T23:15:00Z"), 23);
        assert_eq!(hour_of("2024-03-05T23:15:00+05:30"), 23);
        assert_eq!(hour_of("2024-03-05 02:00:00-07:00"), 2);
    }

    #[test]
    fn test_garbage_timestamp() {
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-40 10:00:00").is_none());
    }

    fn sample_table(rows: &[[&str; 3]]) -> EventTable {
        EventTable::new(
            vec!["timestamp".into(), "latitude".into(), "longitude".into()],
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    const COLS: RequiredColumns = RequiredColumns { timestamp: 0, latitude: 1, longitude: 2 };

    #[test]
    fn test_derive_records() {
        let table = sample_table(&[
            ["2024-01-01 03:10:00", "10.5", "-20.25"],
            ["2024-01-01 17:45:00", " 11 ", "-21"],
        ]);
        let records = derive(&table, COLS).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hour, 3);
        assert_eq!(records[1].features(), [11.0, -21.0, 17.0]);
    }

    #[test]
    fn test_derive_bad_latitude() {
        let table = sample_table(&[
            ["2024-01-01 03:10:00", "10.5", "-20.25"],
            ["2024-01-01 03:10:00", "north", "-20.25"],
        ]);
        match derive(&table, COLS) {
            Err(AnalysisError::InvalidNumber { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "latitude");
                assert_eq!(value, "north");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_derive_rejects_nan_and_empty() {
        let table = sample_table(&[["2024-01-01", "NaN", "1"]]);
        assert!(derive(&table, COLS).is_err());

        let table = sample_table(&[["2024-01-01", "1", ""]]);
        assert!(derive(&table, COLS).is_err());
    }

    #[test]
    fn test_derive_rejects_out_of_range_coordinates() {
        let table = sample_table(&[["2024-01-01", "1.7e308", "0"]]);
        assert!(matches!(
            derive(&table, COLS),
            Err(AnalysisError::InvalidNumber { row: 1, .. })
        ));

        let table = sample_table(&[["2024-01-01", "45", "-180.5"]]);
        match derive(&table, COLS) {
            Err(AnalysisError::InvalidNumber { column, .. }) => assert_eq!(column, "longitude"),
            other => panic!("expected InvalidNumber, got {:?}", other),
        }

        let table = sample_table(&[["2024-01-01", "-90", "180"]]);
        assert!(derive(&table, COLS).is_ok());
    }

    #[test]
    fn test_derive_bad_timestamp() {
        let table = sample_table(&[["tomorrow", "1", "2"]]);
        assert!(matches!(
            derive(&table, COLS),
            Err(AnalysisError::InvalidTimestamp { row: 1, .. })
        ));
    }
}
