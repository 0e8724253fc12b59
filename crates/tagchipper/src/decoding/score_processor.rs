//! # Score Processor Trait

use crate::errors::{TCResult, TagchipperError};
use crate::types::TokenType;

/// A per-step hook over next-token scores.
///
/// Called once per generation step per batch row, before the next id is
/// selected. Processors hold no per-row state; the caller owns the
/// growing id sequence.
pub trait ScoreProcessor<T: TokenType>: Send + Sync {
    /// Adjust one row's scores in place.
    ///
    /// ## Arguments
    /// * `ids` - The ids generated so far for this row.
    /// * `scores` - The row's scores over the full vocabulary.
    fn process(
        &self,
        ids: &[T],
        scores: &mut [f32],
    ) -> TCResult<()>;

    /// Adjust every row of a batch.
    ///
    /// Rows are independent; with the ``rayon`` feature they run in parallel.
    fn process_batch(
        &self,
        rows: &[Vec<T>],
        scores: &mut [Vec<f32>],
    ) -> TCResult<()> {
        if rows.len() != scores.len() {
            return Err(TagchipperError::BatchLengthMismatch {
                left: rows.len(),
                right: scores.len(),
            });
        }

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                let iter = rows.par_iter().zip(scores.par_iter_mut());
            } else {
                let iter = rows.iter().zip(scores.iter_mut());
            }
        }
        iter.try_for_each(|(ids, row_scores)| self.process(ids, row_scores))
    }
}

/// An ordered list of [`ScoreProcessor`]s, applied in insertion order.
pub struct ScoreProcessorList<T: TokenType> {
    processors: Vec<Box<dyn ScoreProcessor<T>>>,
}

impl<T: TokenType> Default for ScoreProcessorList<T> {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
        }
    }
}

impl<T: TokenType> ScoreProcessorList<T> {
    /// Append a processor.
    pub fn push<P>(
        &mut self,
        processor: P,
    ) where
        P: ScoreProcessor<T> + 'static,
    {
        self.processors.push(Box::new(processor));
    }

    /// Append a processor.
    pub fn with<P>(
        mut self,
        processor: P,
    ) -> Self
    where
        P: ScoreProcessor<T> + 'static,
    {
        self.push(processor);
        self
    }

    /// The number of processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Is the list empty?
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl<T: TokenType> ScoreProcessor<T> for ScoreProcessorList<T> {
    fn process(
        &self,
        ids: &[T],
        scores: &mut [f32],
    ) -> TCResult<()> {
        self.processors
            .iter()
            .try_for_each(|p| p.process(ids, scores))
    }
}
