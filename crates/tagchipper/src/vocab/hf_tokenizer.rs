//! # HuggingFace ``tokenizers`` Adapter

use std::path::Path;

use tokenizers::{AddedToken, Tokenizer};

use crate::errors::{TCResult, TagchipperError};
use crate::vocab::{BaseTokenizer, SpecialTokens};

fn external<E: core::fmt::Display>(err: E) -> TagchipperError {
    TagchipperError::External(err.to_string())
}

/// A [`BaseTokenizer`] over a HuggingFace [`Tokenizer`].
///
/// The special token texts default to the ``XLMRoberta`` names:
/// `<pad>`, `<s>`, `</s>`, `<unk>`.
#[derive(Clone)]
pub struct HfTokenizer {
    inner: Tokenizer,
    special_tokens: SpecialTokens<u32>,
}

impl HfTokenizer {
    /// Wrap a tokenizer, resolving the default special token names.
    pub fn new(inner: Tokenizer) -> TCResult<Self> {
        Self::with_special_names(inner, "<pad>", "<s>", "</s>", "<unk>")
    }

    /// Load a `tokenizer.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TCResult<Self> {
        Self::new(Tokenizer::from_file(path).map_err(external)?)
    }

    /// Wrap a tokenizer, resolving the given special token names.
    ///
    /// ## Returns
    /// `External` if `pad`, `bos`, or `eos` are not in the vocabulary.
    pub fn with_special_names(
        inner: Tokenizer,
        pad: &str,
        bos: &str,
        eos: &str,
        unk: &str,
    ) -> TCResult<Self> {
        let lookup = |name: &str| {
            inner
                .token_to_id(name)
                .ok_or_else(|| external(format!("special token {name:?} not in vocabulary")))
        };
        let special_tokens = SpecialTokens {
            pad_id: lookup(pad)?,
            pad_token: pad.to_string(),
            bos_id: lookup(bos)?,
            eos_id: lookup(eos)?,
            unk_id: inner.token_to_id(unk),
        };
        Ok(Self {
            inner,
            special_tokens,
        })
    }

    /// The wrapped tokenizer.
    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }
}

impl BaseTokenizer<u32> for HfTokenizer {
    fn special_tokens(&self) -> &SpecialTokens<u32> {
        &self.special_tokens
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    fn token_to_id(
        &self,
        token: &str,
    ) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    fn id_to_token(
        &self,
        id: u32,
    ) -> Option<String> {
        self.inner.id_to_token(id)
    }

    fn add_special_tokens(
        &mut self,
        tokens: &[String],
    ) -> usize {
        let before = self.vocab_size();
        let tokens = tokens
            .iter()
            .map(|t| AddedToken::from(t.clone(), true))
            .collect::<Vec<_>>();
        self.inner.add_special_tokens(&tokens);
        self.vocab_size().saturating_sub(before)
    }

    fn encode(
        &self,
        text: &str,
    ) -> TCResult<Vec<u32>> {
        Ok(self
            .inner
            .encode(text, false)
            .map_err(external)?
            .get_ids()
            .to_vec())
    }

    fn decode(
        &self,
        tokens: &[u32],
    ) -> TCResult<String> {
        self.inner.decode(tokens, false).map_err(external)
    }
}
