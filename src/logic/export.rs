//! Processed dataset export (CSV)

use csv::Writer;

use crate::logic::AnalysisError;
use crate::models::{ScoredDataset, ANOMALY_COLUMN, HOUR_COLUMN, ZSCORE_COLUMNS};

pub const EXPORT_FILENAME: &str = "processed_data.csv";

/// Position of `name` in `headers`, appending it when absent
fn column_slot(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(i) => i,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Original columns verbatim, then `hour`, z-score columns (when present)
/// and `anomaly`. A derived column that already exists is overwritten in place.
pub fn to_csv(dataset: &ScoredDataset) -> Result<Vec<u8>, AnalysisError> {
    let mut headers = dataset.table.headers.clone();

    let hour_col = column_slot(&mut headers, HOUR_COLUMN);
    let z_cols = dataset
        .zscores
        .as_ref()
        .map(|_| ZSCORE_COLUMNS.map(|name| column_slot(&mut headers, name)));
    let anomaly_col = column_slot(&mut headers, ANOMALY_COLUMN);

    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(&headers)?;

    for (i, cells) in dataset.table.rows.iter().enumerate() {
        let mut row = cells.clone();
        row.resize(headers.len(), String::new());

        row[hour_col] = dataset.records[i].hour.to_string();
        if let (Some(cols), Some(zscores)) = (z_cols, dataset.zscores.as_ref()) {
            for (col, z) in cols.iter().zip(zscores[i]) {
                row[*col] = z.to_string();
            }
        }
        row[anomaly_col] = dataset.labels[i].to_string();

        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    tracing::debug!("Exported {} rows ({} bytes)", dataset.table.len(), data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{pipeline, IsolationForest, ZScoreDetector};

    const INPUT: &str = "device,timestamp,latitude,longitude\n\
        a,2024-01-01T08:15:00Z,51.5,-0.12\n\
        b,2024-01-01T09:45:00Z,51.51,-0.13\n\
        c,2024-01-01T22:05:00Z,51.49,-0.11\n";

    fn parse(data: &[u8]) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(data);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_isolation_forest_export_columns() {
        let dataset = pipeline::run(INPUT.as_bytes(), &IsolationForest::new(50, 0.1, 42)).unwrap();
        let rows = parse(&to_csv(&dataset).unwrap());

        assert_eq!(rows[0], vec!["device", "timestamp", "latitude", "longitude", "hour", "anomaly"]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][..4], ["a", "2024-01-01T08:15:00Z", "51.5", "-0.12"]);
        assert_eq!(rows[3][4], "22");
        assert!(rows[1..].iter().all(|r| r[5] == "Normal" || r[5] == "Anomalous"));
    }

    #[test]
    fn test_zscore_export_columns() {
        let dataset = pipeline::run(INPUT.as_bytes(), &ZScoreDetector::new(3.0)).unwrap();
        let rows = parse(&to_csv(&dataset).unwrap());

        assert_eq!(
            rows[0],
            vec![
                "device", "timestamp", "latitude", "longitude", "hour",
                "latitude_zscore", "longitude_zscore", "hour_zscore", "anomaly",
            ]
        );
        let z: f64 = rows[1][5].parse().unwrap();
        assert!(z.is_finite());
    }

    #[test]
    fn test_existing_derived_columns_overwritten() {
        let input = "timestamp,anomaly,latitude,longitude,hour\n\
            2024-01-01 05:00:00,stale,1.0,2.0,99\n";
        let dataset = pipeline::run(input.as_bytes(), &ZScoreDetector::new(3.0)).unwrap();
        let rows = parse(&to_csv(&dataset).unwrap());

        assert_eq!(rows[0][..5], ["timestamp", "anomaly", "latitude", "longitude", "hour"]);
        assert_eq!(rows[0].len(), 8);
        assert_eq!(rows[1][1], "Normal");
        assert_eq!(rows[1][4], "5");
    }
}
