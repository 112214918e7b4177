//! Z-score threshold scorer
//!
//! Each feature is standardized independently with its sample mean and
//! sample standard deviation (n - 1). A row is anomalous when ANY feature's
//! |z| exceeds the threshold. This OR rule is a per-axis approximation and
//! not a joint (e.g. Mahalanobis) test: correlated features are not
//! accounted for.

use crate::logic::{AnalysisError, AnomalyScorer, ScoreOutput};
use crate::models::{FeatureVector, Label, ScorerSettings, ZScoreParams};

#[derive(Debug, Clone)]
pub struct ZScoreDetector {
    pub threshold: f64,
}

/// Per-feature sample statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStats {
    pub mean: [f64; 3],
    pub std: [f64; 3],
}

impl FeatureStats {
    pub fn compute(data: &[FeatureVector]) -> Self {
        let n = data.len();
        let mut mean = [0.0; 3];
        let mut std = [0.0; 3];

        if n == 0 {
            return Self { mean, std };
        }

        for f in 0..3 {
            mean[f] = data.iter().map(|x| x[f]).sum::<f64>() / n as f64;
        }

        if n > 1 {
            for f in 0..3 {
                let ss: f64 = data.iter().map(|x| (x[f] - mean[f]).powi(2)).sum();
                std[f] = (ss / (n - 1) as f64).sqrt();
            }
        }

        Self { mean, std }
    }

    /// Standardize one row. Zero-variance features map to 0.
    pub fn standardize(&self, x: &FeatureVector) -> FeatureVector {
        let mut z = [0.0; 3];
        for f in 0..3 {
            if self.std[f] > 0.0 {
                z[f] = (x[f] - self.mean[f]) / self.std[f];
            }
        }
        z
    }
}

impl ZScoreDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_params(params: &ZScoreParams) -> Self {
        Self::new(params.threshold)
    }

    pub fn is_anomalous(&self, z: &FeatureVector) -> bool {
        z.iter().any(|v| v.abs() > self.threshold)
    }
}

impl AnomalyScorer for ZScoreDetector {
    fn name(&self) -> &'static str {
        "zscore"
    }

    fn settings(&self) -> ScorerSettings {
        ScorerSettings::ZScore {
            threshold: self.threshold,
        }
    }

    fn score(&self, features: &[FeatureVector]) -> Result<ScoreOutput, AnalysisError> {
        let stats = FeatureStats::compute(features);
        let zscores: Vec<FeatureVector> = features.iter().map(|x| stats.standardize(x)).collect();

        let labels = zscores
            .iter()
            .map(|z| if self.is_anomalous(z) { Label::Anomalous } else { Label::Normal })
            .collect();

        let scores = zscores
            .iter()
            .map(|z| z.iter().fold(0.0_f64, |m, v| m.max(v.abs())))
            .collect();

        Ok(ScoreOutput {
            labels,
            scores,
            zscores: Some(zscores),
            threshold: self.threshold,
        })
    }
}
