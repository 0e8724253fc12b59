//! # Repetition Penalty

use crate::decoding::ScoreProcessor;
use crate::errors::{TCResult, TagchipperError};
use crate::types::{TCHashSet, TokenType, token_index};

/// The default repetition penalty.
pub const DEFAULT_REPETITION_PENALTY: f32 = 1.06;

/// Discourages ids which already occur in the row.
///
/// For each distinct prior id: positive scores are divided by the penalty,
/// negative scores multiplied by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepetitionPenalty {
    penalty: f32,
}

impl Default for RepetitionPenalty {
    fn default() -> Self {
        Self {
            penalty: DEFAULT_REPETITION_PENALTY,
        }
    }
}

impl RepetitionPenalty {
    /// Create a penalty pass.
    ///
    /// ## Returns
    /// `InvalidOption` unless `penalty` is finite and positive.
    pub fn new(penalty: f32) -> TCResult<Self> {
        if !(penalty.is_finite() && penalty > 0.0) {
            return Err(TagchipperError::InvalidOption(format!(
                "repetition penalty must be finite and > 0: {penalty}"
            )));
        }
        Ok(Self { penalty })
    }

    /// The penalty factor.
    pub fn penalty(&self) -> f32 {
        self.penalty
    }
}

impl<T: TokenType> ScoreProcessor<T> for RepetitionPenalty {
    fn process(
        &self,
        ids: &[T],
        scores: &mut [f32],
    ) -> TCResult<()> {
        let seen: TCHashSet<usize> = ids.iter().map(|&id| token_index(id)).collect();
        for idx in seen {
            if let Some(score) = scores.get_mut(idx) {
                *score = if *score < 0.0 {
                    *score * self.penalty
                } else {
                    *score / self.penalty
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty() {
        let penalty = RepetitionPenalty::new(2.0).unwrap();
        let mut scores = vec![4.0, -4.0, 4.0, f32::NEG_INFINITY];

        ScoreProcessor::<u32>::process(&penalty, &[0, 1, 1, 3, 99], &mut scores).unwrap();
        assert_eq!(scores, vec![2.0, -8.0, 4.0, f32::NEG_INFINITY]);
    }

    #[test]
    fn test_default() {
        assert_eq!(RepetitionPenalty::default().penalty(), 1.06);
        assert!(RepetitionPenalty::new(0.0).is_err());
        assert!(RepetitionPenalty::new(f32::NAN).is_err());
    }
}
