//! # Base Tokenizer Trait

use crate::errors::TCResult;
use crate::types::TokenType;

/// The special token ids a base tokenizer declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens<T: TokenType> {
    /// The padding token id.
    pub pad_id: T,

    /// The padding token text; stripped from decoded output.
    pub pad_token: String,

    /// The start-of-sequence id; generation starts from it.
    pub bos_id: T,

    /// The end-of-sequence id; generation stops on it.
    pub eos_id: T,

    /// The unknown token id, if the tokenizer has one.
    pub unk_id: Option<T>,
}

/// The base tokenizer collaborator.
///
/// Implementations own the learned vocabulary; this crate only adds
/// atomic special tokens to it, and reads ids back.
pub trait BaseTokenizer<T: TokenType>: Send + Sync {
    /// The declared special tokens.
    fn special_tokens(&self) -> &SpecialTokens<T>;

    /// The total vocabulary size, including added tokens.
    ///
    /// Every id is in ``0..vocab_size()``.
    fn vocab_size(&self) -> usize;

    /// Look up the id of a token string.
    fn token_to_id(
        &self,
        token: &str,
    ) -> Option<T>;

    /// Look up the token string of an id.
    fn id_to_token(
        &self,
        id: T,
    ) -> Option<String>;

    /// Add atomic special tokens.
    ///
    /// Tokens already present keep their ids.
    ///
    /// ## Returns
    /// The number of newly created ids.
    fn add_special_tokens(
        &mut self,
        tokens: &[String],
    ) -> usize;

    /// Encode text into ids, without implicit start/end tokens.
    fn encode(
        &self,
        text: &str,
    ) -> TCResult<Vec<T>>;

    /// Decode ids into text; special tokens are kept.
    fn decode(
        &self,
        tokens: &[T],
    ) -> TCResult<String>;

    /// Decode a batch of id sequences.
    fn decode_batch(
        &self,
        batch: &[&[T]],
    ) -> TCResult<Vec<String>> {
        batch.iter().map(|tokens| self.decode(tokens)).collect()
    }
}
