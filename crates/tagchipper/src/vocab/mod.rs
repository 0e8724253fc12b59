//! # Vocabulary
//!
//! This module maps grammar tags onto the token id space of a base tokenizer.
//!
//! ## Base Tokenizers
//!
//! The base tokenizer is an external collaborator, reached through the
//! [`BaseTokenizer`] trait. Provided implementations:
//! * [`ByteTokenizer`] - a byte-level tokenizer with atomic special tokens.
//! * `HfTokenizer` - an adapter for HuggingFace ``tokenizers`` (feature ``hf``).
//!
//! ## Tag Vocabulary
//!
//! [`TagVocab`] registers every [`crate::schema::TagGrammar`] tag as an atomic
//! special token, and tracks which ids are structural.

pub mod base_tokenizer;
pub mod byte_tokenizer;
#[cfg(feature = "hf")]
pub mod hf_tokenizer;
pub mod special_vocab;
pub mod tag_vocab;

#[doc(inline)]
pub use base_tokenizer::{BaseTokenizer, SpecialTokens};
#[doc(inline)]
pub use byte_tokenizer::ByteTokenizer;
#[cfg(feature = "hf")]
#[doc(inline)]
pub use hf_tokenizer::HfTokenizer;
#[doc(inline)]
pub use special_vocab::SpecialVocab;
#[doc(inline)]
pub use tag_vocab::TagVocab;
