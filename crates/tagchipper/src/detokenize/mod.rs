//! # Detokenization
//!
//! Raw generated ids are decoded through the base tokenizer, then
//! canonicalized: padding text is dropped, and the whitespace some
//! tokenizers insert around special tokens is collapsed.

pub mod canonicalizer;
pub mod detokenizer;

#[doc(inline)]
pub use canonicalizer::Canonicalizer;
#[doc(inline)]
pub use detokenizer::Detokenizer;
