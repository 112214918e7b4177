//! Isolation Forest scorer
//!
//! Anomalies are few and different, so random axis-aligned splits isolate
//! them in fewer steps than normal points. Each tree is grown on a random
//! subsample; the average path length to isolate a point is turned into a
//! score in (0, 1] where higher means more anomalous.
//!
//! The decision boundary is calibrated so that roughly `contamination` of
//! the scored rows fall above it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::{AnalysisError, AnomalyScorer, ScoreOutput};
use crate::models::{FeatureVector, IsolationForestParams, Label, ScorerSettings};

/// Subsample size per tree
pub const MAX_SAMPLES: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_9;

#[derive(Debug, Clone)]
pub struct IsolationForest {
    pub estimators: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl IsolationForest {
    pub fn new(estimators: usize, contamination: f64, seed: u64) -> Self {
        Self {
            estimators,
            contamination,
            seed,
        }
    }

    pub fn from_params(params: &IsolationForestParams, default_seed: u64) -> Self {
        Self::new(
            params.estimators,
            params.contamination,
            params.seed.unwrap_or(default_seed),
        )
    }

    /// Grow the forest on `data`
    pub fn fit(&self, data: &[FeatureVector]) -> Result<FittedForest, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }

        let sample_size = data.len().min(MAX_SAMPLES);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let trees = (0..self.estimators)
            .map(|_| {
                let sample: Vec<FeatureVector> = rand::seq::index::sample(&mut rng, data.len(), sample_size)
                    .into_iter()
                    .map(|i| data[i])
                    .collect();
                Node::grow(sample, 0, max_depth, &mut rng)
            })
            .collect();

        Ok(FittedForest { trees, sample_size })
    }
}

impl AnomalyScorer for IsolationForest {
    fn name(&self) -> &'static str {
        "isolation_forest"
    }

    fn settings(&self) -> ScorerSettings {
        ScorerSettings::IsolationForest {
            contamination: self.contamination,
            estimators: self.estimators,
            seed: self.seed,
        }
    }

    fn score(&self, features: &[FeatureVector]) -> Result<ScoreOutput, AnalysisError> {
        let forest = self.fit(features)?;
        let scores: Vec<f64> = features.iter().map(|x| forest.score(x)).collect();
        let threshold = percentile(&scores, 1.0 - self.contamination);

        let labels = scores
            .iter()
            .map(|&s| if s > threshold { Label::Anomalous } else { Label::Normal })
            .collect();

        Ok(ScoreOutput {
            labels,
            scores,
            zscores: None,
            threshold,
        })
    }
}

/// Trained forest
#[derive(Debug, Clone)]
pub struct FittedForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl FittedForest {
    /// Anomaly score `2^(-E[h(x)] / c(ψ))`
    pub fn score(&self, x: &FeatureVector) -> f64 {
        let norm = average_path_length(self.sample_size);
        if norm == 0.0 || self.trees.is_empty() {
            return 0.5;
        }

        let mean_depth = self.trees.iter().map(|t| t.path_length(x, 0)).sum::<f64>()
            / self.trees.len() as f64;

        2f64.powf(-mean_depth / norm)
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn grow(points: Vec<FeatureVector>, depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if depth >= max_depth || points.len() <= 1 {
            return Node::Leaf { size: points.len() };
        }

        // Only features that still vary inside this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..3)
            .filter_map(|f| {
                let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[f]), hi.max(p[f]))
                });
                // A span that overflows f64 cannot be sampled
                (max > min && (max - min).is_finite()).then_some((f, min, max))
            })
            .collect();

        if candidates.is_empty() {
            return Node::Leaf { size: points.len() };
        }

        let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(min..max);

        let (left, right): (Vec<_>, Vec<_>) = points.into_iter().partition(|p| p[feature] < threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Node::grow(left, depth + 1, max_depth, rng)),
            right: Box::new(Node::grow(right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, x: &FeatureVector, depth: usize) -> f64 {
        match self {
            Node::Leaf { size } => depth as f64 + average_path_length(*size),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if x[*feature] < *threshold {
                    left.path_length(x, depth + 1)
                } else {
                    right.path_length(x, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile, `q` in [0, 1]
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
