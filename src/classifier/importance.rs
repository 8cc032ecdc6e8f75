//! Per-feature separability between the normal and failure groups.
//!
//! Raw score is `|mean_n - mean_f| / sqrt(var_n + var_f)` with population
//! variances, falling back to the plain mean difference when both variances
//! are zero. Scores are normalized to sum to 1 and sorted descending; ties
//! keep column order.

use crate::core::FeatureImportance;
use crate::dataset::{Dataset, Label};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GroupStats {
    count: usize,
    mean: f64,
    variance: f64,
}

impl GroupStats {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            count: values.len(),
            mean,
            variance,
        }
    }
}

/// Unnormalized separability of one feature column
pub fn separability(normal: &[f64], failure: &[f64]) -> f64 {
    let n = GroupStats::from_values(normal);
    let f = GroupStats::from_values(failure);
    if n.count == 0 || f.count == 0 {
        return 0.0;
    }

    let diff = (n.mean - f.mean).abs();
    let spread = n.variance + f.variance;
    if spread == 0.0 {
        diff
    } else {
        diff / spread.sqrt()
    }
}

/// Normalize so entries sum to 1; all zero when the total is zero
pub fn normalize(scores: Vec<(String, f64)>) -> Vec<FeatureImportance> {
    let total: f64 = scores.iter().map(|(_, s)| s).sum();
    scores
        .into_iter()
        .map(|(name, score)| FeatureImportance {
            name,
            value: if total > 0.0 { score / total } else { 0.0 },
        })
        .collect()
}

/// Score every feature column of `dataset`. Empty datasets give an empty list.
pub fn feature_importance(dataset: &Dataset) -> Vec<FeatureImportance> {
    let scores: Vec<(String, f64)> = dataset
        .features()
        .iter()
        .map(|feature| {
            let mut normal = Vec::new();
            let mut failure = Vec::new();
            for (label, value) in dataset.column(feature) {
                match label {
                    Some(Label::Normal) => normal.push(value),
                    Some(Label::Failure) => failure.push(value),
                    None => {}
                }
            }
            let score = separability(&normal, &failure);
            debug!(
                feature = %feature,
                normal = normal.len(),
                failure = failure.len(),
                score,
                "Scored feature"
            );
            (feature.clone(), score)
        })
        .collect();

    let mut ranked = normalize(scores);
    // stable: equal scores keep column order
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}
