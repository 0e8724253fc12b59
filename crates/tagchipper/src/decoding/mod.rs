//! # Constrained Decoding
//!
//! Per-step score processing for grammar-constrained generation:
//!
//! * [`last_tag`] - the decoding state of a partial sequence.
//! * [`ScoreProcessor`] - the per-row, per-step score hook.
//! * [`GrammarScorer`] - masks structural ids the grammar forbids next.
//! * [`RepetitionPenalty`], [`BannedTokens`] - independent score passes.
//! * [`GreedyGenerator`] - the greedy autoregressive driver over a [`SequenceModel`].
//!
//! Within a step, the grammar mask always runs last; no other pass can
//! make an illegal structural transition selectable.

pub mod banned_tokens;
pub mod generator;
pub mod grammar_scorer;
pub mod repetition_penalty;
pub mod score_processor;
pub mod state_tracker;

#[doc(inline)]
pub use banned_tokens::BannedTokens;
#[doc(inline)]
pub use generator::{GenerationOptions, GreedyGenerator, SequenceModel, argmax};
#[doc(inline)]
pub use grammar_scorer::GrammarScorer;
#[doc(inline)]
pub use repetition_penalty::RepetitionPenalty;
#[doc(inline)]
pub use score_processor::{ScoreProcessor, ScoreProcessorList};
#[doc(inline)]
pub use state_tracker::last_tag;
