//! # `tagchipper` Schema-Constrained Receipt Decoding
//!
//! `tagchipper` enforces a fixed tag grammar on the output of a
//! vision-to-sequence model which extracts receipt fields
//! (company, date, address, total) as a tagged string:
//!
//! ```text
//! <s><s_company>ACME</s_company><s_date>2024-01-01</s_date><s_address></s_address><s_total>10.00</s_total></s>
//! ```
//!
//! See:
//! * [`schema`] for the fields, tags, transition grammar, and [`schema::Receipt`].
//! * [`vocab`] to register grammar tags in a base tokenizer.
//! * [`labels`] to encode training label tensors.
//! * [`pixels`] for the image preprocessing seam.
//! * [`decoding`] for the per-step grammar mask and the greedy generation driver.
//! * [`detokenize`] to recover canonical tagged strings from raw model output.
//! * [`evaluation`] for the normalized edit distance metric.
//! * [`extractor`] which wires the pieces together around an external model.
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tagchipper::decoding::{GrammarScorer, last_tag};
//! use tagchipper::schema::TagGrammar;
//! use tagchipper::vocab::{BaseTokenizer, ByteTokenizer, TagVocab};
//!
//! let grammar = Arc::new(TagGrammar::receipt());
//! let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
//! let (vocab, _added) = TagVocab::register(&grammar, &mut tokenizer).unwrap();
//! let vocab = Arc::new(vocab);
//!
//! let scorer = GrammarScorer::new(grammar, vocab.clone());
//! let mut scores = vec![0.0_f32; tokenizer.vocab_size()];
//!
//! let ids = tokenizer.encode("<s><s_company>ACME</s_company>").unwrap();
//! scorer.mask(last_tag(&vocab, &ids).unwrap(), &mut scores).unwrap();
//! ```
#![warn(missing_docs, unused)]

pub mod decoding;
pub mod detokenize;
pub mod errors;
pub mod evaluation;
pub mod extractor;
pub mod labels;
pub mod pixels;
pub mod schema;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{TCResult, TagchipperError};
#[doc(inline)]
pub use types::TokenType;
