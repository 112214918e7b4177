//! Report assembly: label counts, anomaly map, preview

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::logic::AnomalyScorer;
use crate::models::{
    AnalysisReport, AnomalyMap, Feature, FeatureCollection, FeatureProperties, Label, LabelCounts,
    MapCenter, Point, ScoredDataset,
};

/// Rows shown in the uploaded-data preview
pub const PREVIEW_ROWS: usize = 5;

pub const MAP_TITLE: &str = "Detected Anomalies";
pub const MAP_STYLE: &str = "open-street-map";

pub fn count_labels(labels: &[Label]) -> LabelCounts {
    let anomalous = labels.iter().filter(|l| l.is_anomalous()).count();
    LabelCounts {
        normal: labels.len() - anomalous,
        anomalous,
        total: labels.len(),
    }
}

/// Scatter of anomalous rows only
pub fn anomaly_map(dataset: &ScoredDataset) -> AnomalyMap {
    let features: Vec<Feature> = dataset
        .anomalous_rows()
        .map(|i| {
            let record = &dataset.records[i];
            Feature {
                kind: "Feature".to_string(),
                geometry: Point {
                    kind: "Point".to_string(),
                    coordinates: [record.longitude, record.latitude],
                },
                properties: FeatureProperties {
                    row: i + 1,
                    timestamp: dataset.table.rows[i][dataset.columns.timestamp].clone(),
                    parsed_time: record.timestamp,
                    anomaly: Label::Anomalous.to_string(),
                    score: dataset.scores[i],
                },
            }
        })
        .collect();

    let center = if features.is_empty() {
        None
    } else {
        let n = features.len() as f64;
        let (lat, lon) = features.iter().fold((0.0, 0.0), |(lat, lon), f| {
            (lat + f.geometry.coordinates[1], lon + f.geometry.coordinates[0])
        });
        Some(MapCenter {
            latitude: lat / n,
            longitude: lon / n,
        })
    };

    AnomalyMap {
        title: MAP_TITLE.to_string(),
        style: MAP_STYLE.to_string(),
        center,
        geojson: FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features,
        },
    }
}

pub fn fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn build_report(dataset: &ScoredDataset, scorer: &dyn AnomalyScorer, input: &[u8]) -> AnalysisReport {
    AnalysisReport {
        analysis_id: Uuid::new_v4(),
        method: scorer.name().to_string(),
        parameters: scorer.settings(),
        row_count: dataset.table.len(),
        counts: count_labels(&dataset.labels),
        decision_threshold: dataset.threshold,
        preview: dataset.table.preview(PREVIEW_ROWS),
        map: anomaly_map(dataset),
        input_sha256: fingerprint(input),
        generated_at: Utc::now(),
    }
}
