//! # Error Types

use crate::schema::Tag;

/// Errors from tagchipper operations.
///
/// Grammar and vocabulary mismatches are fatal; nothing in this crate
/// retries or suppresses them.
#[derive(Debug, thiserror::Error)]
pub enum TagchipperError {
    /// A tag was looked up in a grammar that does not contain it.
    #[error("unknown grammar state: {tag}")]
    UnknownState {
        /// The tag that was not part of the grammar.
        tag: Tag,
    },

    /// A decoding state scan found no structural tag.
    ///
    /// This means the generation was started without the start sentinel.
    #[error("no structural tag found in {len} decoded tokens")]
    NoStructuralTag {
        /// The length of the scanned sequence.
        len: usize,
    },

    /// The grammar has no legal successor for the tag.
    ///
    /// Masking would remove every structural candidate.
    #[error("no legal successor for grammar state: {tag}")]
    NoLegalSuccessor {
        /// The state which was queried.
        tag: Tag,
    },

    /// Every score of a row was masked to negative infinity.
    #[error("all scores of row {row} are -inf")]
    DegenerateScores {
        /// The batch row.
        row: usize,
    },

    /// A score vector does not cover the structural tag ids.
    #[error("score vector of length {len} does not cover token id {required}")]
    ScoresTooShort {
        /// The score vector length.
        len: usize,
        /// The smallest length needed.
        required: usize,
    },

    /// The grammar definition is malformed.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// Vocabulary data is inconsistent.
    #[error("vocab conflict: {0}")]
    VocabConflict(String),

    /// The label ignore id collides with the token id range.
    #[error("ignore id ({ignore_id}) is inside the token id range 0..{vocab_size}")]
    InvalidIgnoreId {
        /// The configured ignore id.
        ignore_id: i64,
        /// The vocabulary size.
        vocab_size: usize,
    },

    /// An option value is out of its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The label max length must be non-zero.
    #[error("label max length must be > 0")]
    InvalidMaxLength,

    /// Token value out of range for the target type.
    #[error("token out of range: {0}")]
    TokenOutOfRange(usize),

    /// Parallel batch inputs differ in length.
    #[error("batch length mismatch: {left} != {right}")]
    BatchLengthMismatch {
        /// The first batch length.
        left: usize,
        /// The second batch length.
        right: usize,
    },

    /// An index was out of range for a collection.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The collection length.
        len: usize,
    },

    /// Parse error (tag text, token ids, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// Error from an external component.
    #[error("{0}")]
    External(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for tagchipper operations.
pub type TCResult<T> = core::result::Result<T, TagchipperError>;
