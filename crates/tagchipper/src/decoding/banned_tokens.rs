//! # Banned Tokens

use crate::decoding::ScoreProcessor;
use crate::errors::TCResult;
use crate::types::{TokenType, token_index};

/// Makes a fixed set of ids unselectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannedTokens<T: TokenType> {
    banned: Vec<T>,
}

impl<T: TokenType> BannedTokens<T> {
    /// Ban the given ids.
    pub fn new<I>(banned: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            banned: banned.into_iter().collect(),
        }
    }

    /// The banned ids.
    pub fn banned(&self) -> &[T] {
        &self.banned
    }
}

impl<T: TokenType> ScoreProcessor<T> for BannedTokens<T> {
    fn process(
        &self,
        _ids: &[T],
        scores: &mut [f32],
    ) -> TCResult<()> {
        for &id in &self.banned {
            if let Some(score) = scores.get_mut(token_index(id)) {
                *score = f32::NEG_INFINITY;
            }
        }
        Ok(())
    }
}
