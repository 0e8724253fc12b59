//! # Detokenizer

use std::sync::Arc;

use crate::detokenize::Canonicalizer;
use crate::errors::TCResult;
use crate::types::TokenType;
use crate::vocab::BaseTokenizer;

/// Decodes generated id rows into canonical tagged strings.
#[derive(Clone)]
pub struct Detokenizer<T: TokenType> {
    tokenizer: Arc<dyn BaseTokenizer<T>>,
    canonicalizer: Canonicalizer,
}

impl<T: TokenType> Detokenizer<T> {
    /// Create a detokenizer; pad text comes from the tokenizer.
    pub fn new(tokenizer: Arc<dyn BaseTokenizer<T>>) -> TCResult<Self> {
        let canonicalizer = Canonicalizer::new(tokenizer.special_tokens().pad_token.clone())?;
        Ok(Self {
            tokenizer,
            canonicalizer,
        })
    }

    /// The canonicalizer.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Decode and canonicalize one row.
    pub fn decode(
        &self,
        ids: &[T],
    ) -> TCResult<String> {
        let raw = self.tokenizer.decode(ids)?;
        Ok(self.canonicalizer.canonicalize(&raw))
    }

    /// Decode and canonicalize a batch of rows.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, rows)))]
    pub fn decode_batch(
        &self,
        rows: &[Vec<T>],
    ) -> TCResult<Vec<String>> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                let iter = rows.par_iter();
            } else {
                let iter = rows.iter();
            }
        }
        iter.map(|ids| self.decode(ids)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Receipt, TagGrammar};
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::{ByteTokenizer, TagVocab};

    #[test]
    fn test_decode_batch() {
        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        TagVocab::register(&TagGrammar::receipt(), &mut tokenizer).unwrap();
        let tokenizer = Arc::new(tokenizer);

        let detok = Detokenizer::new(tokenizer.clone() as Arc<dyn BaseTokenizer<u32>>).unwrap();
        check_is_send(&detok);
        check_is_sync(&detok);
        assert_eq!(detok.canonicalizer().pad_text(), "<pad>");

        let receipt = Receipt::new("ACME", "2024-01-01", "", "10.00");
        let clean = tokenizer.encode(&receipt.tagged()).unwrap();

        let mut padded = tokenizer.encode("<s><s_company> ACME </s_company>").unwrap();
        padded.extend([0, 0, 0]);

        let out = detok.decode_batch(&[clean, padded]).unwrap();
        assert_eq!(out[0], receipt.tagged());
        assert_eq!(out[1], "<s><s_company>ACME</s_company>");
    }

    #[test]
    fn test_decode_error() {
        let tokenizer: Arc<dyn BaseTokenizer<u32>> = Arc::new(ByteTokenizer::default());
        let detok = Detokenizer::new(tokenizer).unwrap();
        assert!(detok.decode(&[5000]).is_err());
    }
}
