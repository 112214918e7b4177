//! Schema validation

use crate::logic::AnalysisError;
use crate::models::{EventTable, RequiredColumns, LATITUDE_COLUMN, LONGITUDE_COLUMN, TIMESTAMP_COLUMN};

pub const REQUIRED_COLUMNS: [&str; 3] = [TIMESTAMP_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN];

/// Locate the required columns, or report every one that is absent
pub fn validate(table: &EventTable) -> Result<RequiredColumns, AnalysisError> {
    match (
        table.column_index(TIMESTAMP_COLUMN),
        table.column_index(LATITUDE_COLUMN),
        table.column_index(LONGITUDE_COLUMN),
    ) {
        (Some(timestamp), Some(latitude), Some(longitude)) => Ok(RequiredColumns {
            timestamp,
            latitude,
            longitude,
        }),
        _ => {
            let missing = REQUIRED_COLUMNS
                .iter()
                .filter(|name| table.column_index(name).is_none())
                .map(|name| name.to_string())
                .collect();
            Err(AnalysisError::MissingColumns { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> EventTable {
        EventTable::new(headers.iter().map(|h| h.to_string()).collect(), vec![])
    }

    #[test]
    fn test_all_present_any_order() {
        let cols = validate(&table(&["id", "longitude", "timestamp", "latitude"])).unwrap();
        assert_eq!(cols.timestamp, 2);
        assert_eq!(cols.latitude, 3);
        assert_eq!(cols.longitude, 1);
    }

    #[test]
    fn test_reports_all_missing() {
        match validate(&table(&["timestamp", "lat", "lon"])) {
            Err(AnalysisError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["latitude", "longitude"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        assert!(validate(&table(&["Timestamp", "latitude", "longitude"])).is_err());
    }
}
