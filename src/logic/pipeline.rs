//! Request-scoped analysis pass

use crate::logic::{features, loader, schema, AnalysisError, AnomalyScorer};
use crate::models::{FeatureVector, ScoredDataset};

/// Run one upload through load → validate → derive → score.
/// Scoring is never attempted when a required column is missing.
pub fn run(data: &[u8], scorer: &dyn AnomalyScorer) -> Result<ScoredDataset, AnalysisError> {
    let table = loader::load_csv(data)?;
    let columns = schema::validate(&table)?;
    let records = features::derive(&table, columns)?;

    let vectors: Vec<FeatureVector> = records.iter().map(|r| r.features()).collect();
    let output = scorer.score(&vectors)?;

    let anomalies = output.labels.iter().filter(|l| l.is_anomalous()).count();
    tracing::info!(
        "Analysis complete: method={}, rows={}, anomalies={}, threshold={:.4}",
        scorer.name(),
        records.len(),
        anomalies,
        output.threshold
    );

    Ok(ScoredDataset {
        table,
        columns,
        records,
        labels: output.labels,
        scores: output.scores,
        zscores: output.zscores,
        threshold: output.threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{IsolationForest, ZScoreDetector};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Scorer that records whether it was called
    struct CallTracker {
        called: AtomicBool,
    }

    impl AnomalyScorer for CallTracker {
        fn name(&self) -> &'static str {
            "call_tracker"
        }

        fn settings(&self) -> crate::models::ScorerSettings {
            crate::models::ScorerSettings::ZScore { threshold: 0.0 }
        }

        fn score(&self, features: &[FeatureVector]) -> Result<crate::logic::ScoreOutput, AnalysisError> {
            self.called.store(true, Ordering::SeqCst);
            ZScoreDetector::new(3.0).score(features)
        }
    }

    fn csv_rows(n: usize) -> String {
        let mut s = String::from("id,timestamp,latitude,longitude\n");
        for i in 0..n {
            s.push_str(&format!(
                "{},2024-05-01 {:02}:00:00,{},{}\n",
                i,
                i % 24,
                48.85 + (i % 7) as f64 * 0.001,
                2.35 - (i % 5) as f64 * 0.001
            ));
        }
        s
    }

    #[test]
    fn test_row_count_preserved() {
        for n in [1usize, 17, 120] {
            let data = csv_rows(n);
            let z = run(data.as_bytes(), &ZScoreDetector::new(3.0)).unwrap();
            assert_eq!(z.labels.len(), n);
            assert_eq!(z.table.len(), n);

            let f = run(data.as_bytes(), &IsolationForest::new(50, 0.1, 42)).unwrap();
            assert_eq!(f.labels.len(), n);
        }
    }

    #[test]
    fn test_missing_column_skips_scoring() {
        let tracker = CallTracker {
            called: AtomicBool::new(false),
        };
        let data = "timestamp,lat,longitude\n2024-01-01,1,2\n";

        let result = run(data.as_bytes(), &tracker);
        assert!(matches!(result, Err(AnalysisError::MissingColumns { .. })));
        assert!(!tracker.called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_extreme_latitudes_rejected_before_scoring() {
        let data = "timestamp,latitude,longitude\n\
            2024-01-01 01:00:00,1.7e308,1\n\
            2024-01-01 02:00:00,-1.7e308,2\n\
            2024-01-01 03:00:00,0,3\n";

        for scorer in [
            &IsolationForest::new(50, 0.1, 42) as &dyn AnomalyScorer,
            &ZScoreDetector::new(3.0),
        ] {
            let result = run(data.as_bytes(), scorer);
            assert!(matches!(
                result,
                Err(AnalysisError::InvalidNumber { row: 1, .. })
            ));
        }
    }

    #[test]
    fn test_hour_derived() {
        let data = csv_rows(3);
        let dataset = run(data.as_bytes(), &ZScoreDetector::new(3.0)).unwrap();
        let hours: Vec<u32> = dataset.records.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 1, 2]);
    }
}
