//! Event data model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Required input columns
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Derived output columns
pub const HOUR_COLUMN: &str = "hour";
pub const ANOMALY_COLUMN: &str = "anomaly";
pub const ZSCORE_COLUMNS: [&str; 3] = ["latitude_zscore", "longitude_zscore", "hour_zscore"];

/// Scorer input: `[latitude, longitude, hour_of_day]`
pub type FeatureVector = [f64; 3];

/// Uploaded table, every cell kept verbatim
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EventTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for the "uploaded data" table
    pub fn preview(&self, n: usize) -> DataPreview {
        DataPreview {
            columns: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Positions of the required columns within the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub timestamp: usize,
    pub latitude: usize,
    pub longitude: usize,
}

/// One parsed event
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub hour: u32,
}

impl EventRecord {
    pub fn features(&self) -> FeatureVector {
        [self.latitude, self.longitude, self.hour as f64]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Normal,
    Anomalous,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Normal => "Normal",
            Label::Anomalous => "Anomalous",
        }
    }

    pub fn is_anomalous(&self) -> bool {
        matches!(self, Label::Anomalous)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table plus everything derived from it during one analysis
#[derive(Debug, Clone)]
pub struct ScoredDataset {
    pub table: EventTable,
    pub columns: RequiredColumns,
    pub records: Vec<EventRecord>,
    pub labels: Vec<Label>,
    pub scores: Vec<f64>,
    /// Per-row standardized features (threshold variant only)
    pub zscores: Option<Vec<FeatureVector>>,
    pub threshold: f64,
}

impl ScoredDataset {
    pub fn anomalous_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_anomalous())
            .map(|(i, _)| i)
    }
}
