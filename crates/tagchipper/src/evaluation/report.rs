//! # Batch Evaluation Report

use crate::errors::{TCResult, TagchipperError};
use crate::evaluation::normalized_edit_distance;

/// One scored prediction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoredPrediction {
    /// The canonicalized prediction.
    pub prediction: String,

    /// The reference tagged string.
    pub reference: String,

    /// The normalized edit distance.
    pub score: f64,
}

/// The scores of one batch.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EvaluationReport {
    /// The per-item scores, in batch order.
    pub items: Vec<ScoredPrediction>,

    /// The mean score; ``0.0`` for an empty batch.
    pub mean: f64,
}

impl EvaluationReport {
    /// The number of scored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the report empty?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Log every item at `info` level.
    pub fn log_items(&self) {
        for item in &self.items {
            log::info!("Prediction: {}", item.prediction);
            log::info!("    Answer: {}", item.reference);
            log::info!(" Normed ED: {}", item.score);
        }
    }
}

/// Score a batch of predictions against their references.
///
/// ## Returns
/// The report; or `BatchLengthMismatch` if the batches differ in length.
pub fn evaluate_batch<P, R>(
    predictions: &[P],
    references: &[R],
) -> TCResult<EvaluationReport>
where
    P: AsRef<str> + Sync,
    R: AsRef<str> + Sync,
{
    if predictions.len() != references.len() {
        return Err(TagchipperError::BatchLengthMismatch {
            left: predictions.len(),
            right: references.len(),
        });
    }

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            use rayon::prelude::*;
            let iter = predictions.par_iter().zip(references.par_iter());
        } else {
            let iter = predictions.iter().zip(references.iter());
        }
    }
    let items = iter
        .map(|(p, r)| {
            let (prediction, reference) = (p.as_ref(), r.as_ref());
            ScoredPrediction {
                prediction: prediction.to_string(),
                reference: reference.to_string(),
                score: normalized_edit_distance(prediction, reference),
            }
        })
        .collect::<Vec<_>>();

    let mean = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|item| item.score).sum::<f64>() / items.len() as f64
    };

    Ok(EvaluationReport { items, mean })
}
