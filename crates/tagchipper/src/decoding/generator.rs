//! # Greedy Generation Driver

use crate::decoding::{
    BannedTokens, GrammarScorer, RepetitionPenalty, ScoreProcessor, ScoreProcessorList,
    repetition_penalty::DEFAULT_REPETITION_PENALTY,
};
use crate::errors::{TCResult, TagchipperError};
use crate::labels::label_encoder::DEFAULT_MAX_LENGTH;
use crate::pixels::PixelTensor;
use crate::schema::Tag;
use crate::types::TokenType;
use crate::vocab::SpecialTokens;

/// The autoregressive sequence model collaborator.
///
/// The model is a black box producing next-token scores; it knows
/// nothing about the tag grammar.
pub trait SequenceModel<T: TokenType> {
    /// Score the next token of every row.
    ///
    /// ## Arguments
    /// * `pixel_values` - The encoded image batch.
    /// * `rows` - The ids generated so far; every row has the same length.
    ///
    /// ## Returns
    /// One score vector over the full vocabulary per row.
    fn next_token_scores(
        &mut self,
        pixel_values: &PixelTensor,
        rows: &[Vec<T>],
    ) -> TCResult<Vec<Vec<f32>>>;

    /// Resize the output embeddings to cover `vocab_size` ids.
    fn resize_token_embeddings(
        &mut self,
        vocab_size: usize,
    ) -> TCResult<()>;
}

/// Options for configuring a [`GreedyGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// The maximum row length, including the start token.
    pub max_length: usize,

    /// The repetition penalty; ``1.0`` disables it.
    pub repetition_penalty: f32,

    /// Whether the unknown token may never be generated.
    pub ban_unk: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            repetition_penalty: DEFAULT_REPETITION_PENALTY,
            ban_unk: true,
        }
    }
}

impl GenerationOptions {
    /// Sets the maximum row length.
    pub fn with_max_length(
        mut self,
        max_length: usize,
    ) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the repetition penalty.
    pub fn with_repetition_penalty(
        mut self,
        repetition_penalty: f32,
    ) -> Self {
        self.repetition_penalty = repetition_penalty;
        self
    }

    /// Sets whether the unknown token is banned.
    pub fn with_ban_unk(
        mut self,
        ban_unk: bool,
    ) -> Self {
        self.ban_unk = ban_unk;
        self
    }
}

/// Select the highest scoring id.
///
/// `-inf` and `NaN` scores are never selected; ties pick the lowest id.
///
/// ## Returns
/// The selected index; `None` if no score is selectable.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() || score == f32::NEG_INFINITY {
            continue;
        }
        match best {
            Some((_, b)) if score <= b => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Greedy, grammar-constrained generation.
///
/// Each step scores every unfinished row, applies the score processors
/// and then the grammar mask, and appends the argmax. Rows start at the
/// grammar's start tag. A row finishes at the end tag, the tokenizer's eos,
/// or `max_length`; finished rows are padded while the rest of the batch
/// continues.
pub struct GreedyGenerator<T: TokenType> {
    options: GenerationOptions,
    special_tokens: SpecialTokens<T>,
    start_id: T,
    end_id: T,
    processors: ScoreProcessorList<T>,
    grammar: GrammarScorer<T>,
}

impl<T: TokenType> GreedyGenerator<T> {
    /// Create a generator.
    ///
    /// ## Arguments
    /// * `options` - The generation options.
    /// * `special_tokens` - The base tokenizer's special ids.
    /// * `grammar` - The grammar mask; always applied after every other processor.
    ///
    /// ## Returns
    /// `InvalidMaxLength` for a zero `max_length`;
    /// `InvalidOption` for a bad repetition penalty;
    /// `UnknownState` if the sentinels are not registered.
    pub fn new(
        options: GenerationOptions,
        special_tokens: SpecialTokens<T>,
        grammar: GrammarScorer<T>,
    ) -> TCResult<Self> {
        if options.max_length == 0 {
            return Err(TagchipperError::InvalidMaxLength);
        }

        let start_id = grammar.vocab().id_of(Tag::Start)?;
        let end_id = grammar.vocab().id_of(Tag::End)?;

        let mut processors = ScoreProcessorList::default();
        if options.repetition_penalty != 1.0 {
            processors.push(RepetitionPenalty::new(options.repetition_penalty)?);
        }
        if options.ban_unk
            && let Some(unk) = special_tokens.unk_id
        {
            processors.push(BannedTokens::new([unk]));
        }

        Ok(Self {
            options,
            special_tokens,
            start_id,
            end_id,
            processors,
            grammar,
        })
    }

    /// Add a score processor; it runs before the grammar mask.
    pub fn with_processor<P>(
        mut self,
        processor: P,
    ) -> Self
    where
        P: ScoreProcessor<T> + 'static,
    {
        self.processors.push(processor);
        self
    }

    /// The generation options.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// The grammar mask.
    pub fn grammar(&self) -> &GrammarScorer<T> {
        &self.grammar
    }

    /// Score and select the next id of one row.
    fn select(
        &self,
        row: usize,
        ids: &[T],
        mut scores: Vec<f32>,
    ) -> TCResult<T> {
        self.processors.process(ids, &mut scores)?;
        self.grammar.process(ids, &mut scores)?;

        let idx = argmax(&scores).ok_or(TagchipperError::DegenerateScores { row })?;
        T::from_usize(idx).ok_or(TagchipperError::TokenOutOfRange(idx))
    }

    /// Generate a batch of id sequences.
    ///
    /// ## Arguments
    /// * `model` - The sequence model.
    /// * `pixel_values` - The encoded image batch.
    /// * `batch_size` - The number of rows.
    ///
    /// ## Returns
    /// One row per batch entry, each starting with the start tag;
    /// all rows have the same length.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, model, pixel_values)))]
    pub fn generate<M>(
        &self,
        model: &mut M,
        pixel_values: &PixelTensor,
        batch_size: usize,
    ) -> TCResult<Vec<Vec<T>>>
    where
        M: SequenceModel<T> + ?Sized,
    {
        let mut rows = vec![vec![self.start_id]; batch_size];
        let mut finished = vec![self.options.max_length <= 1; batch_size];

        while finished.iter().any(|&f| !f) {
            let scores = model.next_token_scores(pixel_values, &rows)?;
            if scores.len() != batch_size {
                return Err(TagchipperError::BatchLengthMismatch {
                    left: batch_size,
                    right: scores.len(),
                });
            }

            let step = {
                let rows = &rows;
                let finished = &finished;
                let select = |(row, row_scores): (usize, Vec<f32>)| -> TCResult<Option<T>> {
                    if finished[row] {
                        return Ok(None);
                    }
                    self.select(row, &rows[row], row_scores).map(Some)
                };

                cfg_if::cfg_if! {
                    if #[cfg(feature = "rayon")] {
                        use rayon::prelude::*;
                        let iter = scores.into_par_iter().enumerate();
                    } else {
                        let iter = scores.into_iter().enumerate();
                    }
                }
                iter.map(select).collect::<TCResult<Vec<_>>>()?
            };

            for ((ids, done), next) in rows.iter_mut().zip(finished.iter_mut()).zip(step) {
                match next {
                    Some(id) => {
                        ids.push(id);
                        if id == self.end_id
                            || id == self.special_tokens.eos_id
                            || ids.len() >= self.options.max_length
                        {
                            *done = true;
                        }
                    }
                    None => ids.push(self.special_tokens.pad_id),
                }
            }
        }

        Ok(rows)
    }
}
