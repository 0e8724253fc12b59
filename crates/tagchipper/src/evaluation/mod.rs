//! # Evaluation
//!
//! Scores predictions against their references by normalized
//! character-level edit distance; ``0.0`` is a perfect match.

pub mod edit_distance;
pub mod report;

#[doc(inline)]
pub use edit_distance::normalized_edit_distance;
#[doc(inline)]
pub use report::{EvaluationReport, ScoredPrediction, evaluate_batch};
