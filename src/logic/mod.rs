//! Detection pipeline
//!
//! One upload goes through a single linear pass:
//! load → validate schema → derive features → score → present.

pub mod error;
pub mod export;
pub mod features;
pub mod isolation_forest;
pub mod loader;
pub mod pipeline;
pub mod presenter;
pub mod schema;
pub mod zscore;

pub use error::AnalysisError;
pub use isolation_forest::IsolationForest;
pub use zscore::ZScoreDetector;

use crate::models::{FeatureVector, Label, ScorerSettings};

/// Output of a scorer, one entry per input row
#[derive(Debug, Clone)]
pub struct ScoreOutput {
    pub labels: Vec<Label>,
    /// Higher = more anomalous
    pub scores: Vec<f64>,
    pub zscores: Option<Vec<FeatureVector>>,
    pub threshold: f64,
}

/// Interchangeable anomaly scoring strategy
pub trait AnomalyScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Effective parameters, echoed in the report
    fn settings(&self) -> ScorerSettings;

    fn score(&self, features: &[FeatureVector]) -> Result<ScoreOutput, AnalysisError>;
}
