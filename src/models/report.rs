//! Analysis report model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::event::DataPreview;
use super::params::ScorerSettings;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub method: String,
    pub parameters: ScorerSettings,
    pub row_count: usize,
    pub counts: LabelCounts,
    /// Score cutoff (isolation forest) or |z| threshold
    pub decision_threshold: f64,
    pub preview: DataPreview,
    pub map: AnomalyMap,
    pub input_sha256: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    #[serde(rename = "Normal")]
    pub normal: usize,
    #[serde(rename = "Anomalous")]
    pub anomalous: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyMap {
    pub title: String,
    pub style: String,
    pub center: Option<MapCenter>,
    pub geojson: FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// GeoJSON FeatureCollection of point features
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Point,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureProperties {
    /// 1-based data row
    pub row: usize,
    /// As uploaded, shown on hover
    pub timestamp: String,
    pub parsed_time: NaiveDateTime,
    pub anomaly: String,
    pub score: f64,
}
