//! # Grammar Constrained Scorer

use std::sync::Arc;

use crate::decoding::{ScoreProcessor, last_tag};
use crate::errors::{TCResult, TagchipperError};
use crate::schema::{Tag, TagGrammar};
use crate::types::{TokenType, token_index};
use crate::vocab::TagVocab;

/// Masks every structural id the grammar does not allow next.
///
/// Free-text ids are never touched; field contents are unconstrained.
#[derive(Debug, Clone)]
pub struct GrammarScorer<T: TokenType> {
    grammar: Arc<TagGrammar>,
    vocab: Arc<TagVocab<T>>,

    /// ``(tag, score index)`` for every structural id.
    structural: Vec<(Tag, usize)>,

    /// The shortest score vector covering every structural id.
    required_len: usize,
}

impl<T: TokenType> GrammarScorer<T> {
    /// Create a scorer.
    pub fn new(
        grammar: Arc<TagGrammar>,
        vocab: Arc<TagVocab<T>>,
    ) -> Self {
        let structural = vocab
            .structural_ids()
            .map(|(tag, id)| (tag, token_index(id)))
            .collect::<Vec<_>>();
        let required_len = structural.iter().map(|&(_, idx)| idx + 1).max().unwrap_or(0);
        Self {
            grammar,
            vocab,
            structural,
            required_len,
        }
    }

    /// The grammar.
    pub fn grammar(&self) -> &Arc<TagGrammar> {
        &self.grammar
    }

    /// The tag vocabulary.
    pub fn vocab(&self) -> &Arc<TagVocab<T>> {
        &self.vocab
    }

    /// Mask the scores for the state `last`.
    ///
    /// ## Arguments
    /// * `last` - The most recent structural tag.
    /// * `scores` - Scores over the full vocabulary; modified in place.
    ///
    /// ## Returns
    /// * `ScoresTooShort` if `scores` does not cover the structural ids,
    /// * `UnknownState` if `last`, or its successor, is outside the grammar or vocab,
    /// * `NoLegalSuccessor` if `last` is terminal.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, scores)))]
    pub fn mask(
        &self,
        last: Tag,
        scores: &mut [f32],
    ) -> TCResult<()> {
        if scores.len() < self.required_len {
            return Err(TagchipperError::ScoresTooShort {
                len: scores.len(),
                required: self.required_len,
            });
        }

        let allowed = self.grammar.legal_next(last)?;
        if allowed.is_empty() {
            return Err(TagchipperError::NoLegalSuccessor { tag: last });
        }
        for tag in allowed.iter() {
            self.vocab.id_of(tag)?;
        }

        for &(tag, idx) in &self.structural {
            if !allowed.contains(tag) {
                scores[idx] = f32::NEG_INFINITY;
            }
        }
        Ok(())
    }

    /// Mask an owned score vector.
    pub fn masked(
        &self,
        last: Tag,
        mut scores: Vec<f32>,
    ) -> TCResult<Vec<f32>> {
        self.mask(last, &mut scores)?;
        Ok(scores)
    }
}

impl<T: TokenType> ScoreProcessor<T> for GrammarScorer<T> {
    fn process(
        &self,
        ids: &[T],
        scores: &mut [f32],
    ) -> TCResult<()> {
        self.mask(last_tag(&self.vocab, ids)?, scores)
    }
}
