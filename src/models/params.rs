//! Scorer parameters (query string)

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_contamination() -> f64 {
    0.1
}

fn default_estimators() -> usize {
    100
}

fn default_threshold() -> f64 {
    3.0
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IsolationForestParams {
    /// Expected share of anomalous rows
    #[serde(default = "default_contamination")]
    #[validate(range(min = 0.01, max = 0.5, message = "contamination must be between 0.01 and 0.5"))]
    pub contamination: f64,

    /// Number of trees
    #[serde(default = "default_estimators")]
    #[validate(range(min = 50, max = 500, message = "estimators must be between 50 and 500"))]
    pub estimators: usize,

    /// Falls back to the configured default seed
    pub seed: Option<u64>,
}

impl Default for IsolationForestParams {
    fn default() -> Self {
        Self {
            contamination: default_contamination(),
            estimators: default_estimators(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ZScoreParams {
    #[serde(default = "default_threshold")]
    #[validate(range(min = 2.0, max = 5.0, message = "threshold must be between 2.0 and 5.0"))]
    pub threshold: f64,
}

impl Default for ZScoreParams {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Effective parameters echoed back in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScorerSettings {
    IsolationForest {
        contamination: f64,
        estimators: usize,
        seed: u64,
    },
    #[serde(rename = "zscore")]
    ZScore { threshold: f64 },
}
