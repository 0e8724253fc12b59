//! # Label Tensor Encoder

use std::sync::Arc;

use crate::errors::{TCResult, TagchipperError};
use crate::types::{DEFAULT_IGNORE_ID, LabelId, TokenType, token_index};
use crate::vocab::BaseTokenizer;

/// The default decoder max length.
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// Options for configuring a [`LabelEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LabelEncoderOptions {
    /// The fixed label tensor length.
    pub max_length: usize,

    /// The label value written over padding positions.
    pub ignore_id: LabelId,
}

impl Default for LabelEncoderOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ignore_id: DEFAULT_IGNORE_ID,
        }
    }
}

impl LabelEncoderOptions {
    /// Sets the fixed label tensor length.
    pub fn with_max_length(
        mut self,
        max_length: usize,
    ) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the ignore sentinel.
    pub fn with_ignore_id(
        mut self,
        ignore_id: LabelId,
    ) -> Self {
        self.ignore_id = ignore_id;
        self
    }
}

/// A label tensor, with truncation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodedLabels {
    /// The labels; always exactly `max_length` long.
    pub labels: Vec<LabelId>,

    /// The number of target tokens kept (after truncation).
    pub token_count: usize,

    /// Whether the target was longer than `max_length` and cut.
    pub truncated: bool,
}

/// Encodes canonical tagged strings into supervised label tensors.
///
/// Padding positions are overwritten with the ignore sentinel, so they
/// contribute nothing to the loss.
///
/// A content token whose id equals the pad id is masked as well;
/// the encoder cannot tell the two apart once padded.
#[derive(Clone)]
pub struct LabelEncoder<T: TokenType> {
    tokenizer: Arc<dyn BaseTokenizer<T>>,
    options: LabelEncoderOptions,
}

impl<T: TokenType> LabelEncoder<T> {
    /// Create a label encoder.
    ///
    /// ## Returns
    /// `InvalidMaxLength` for a zero `max_length`;
    /// `InvalidIgnoreId` if `ignore_id` is a valid token id.
    pub fn new(
        tokenizer: Arc<dyn BaseTokenizer<T>>,
        options: LabelEncoderOptions,
    ) -> TCResult<Self> {
        if options.max_length == 0 {
            return Err(TagchipperError::InvalidMaxLength);
        }
        let vocab_size = tokenizer.vocab_size();
        if (0..vocab_size as LabelId).contains(&options.ignore_id) {
            return Err(TagchipperError::InvalidIgnoreId {
                ignore_id: options.ignore_id,
                vocab_size,
            });
        }
        Ok(Self { tokenizer, options })
    }

    /// The encoder options.
    pub fn options(&self) -> &LabelEncoderOptions {
        &self.options
    }

    /// Encode a canonical tagged string.
    ///
    /// Over-length targets are right-truncated; this is not an error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, target)))]
    pub fn encode(
        &self,
        target: &str,
    ) -> TCResult<EncodedLabels> {
        let max_length = self.options.max_length;
        let mut tokens = self.tokenizer.encode(target)?;

        let truncated = tokens.len() > max_length;
        if truncated {
            log::debug!(
                "truncating label target from {} to {} tokens",
                tokens.len(),
                max_length
            );
            tokens.truncate(max_length);
        }
        let token_count = tokens.len();

        let pad_id = self.tokenizer.special_tokens().pad_id;
        tokens.resize(max_length, pad_id);

        let labels = tokens
            .into_iter()
            .map(|t| {
                if t == pad_id {
                    Ok(self.options.ignore_id)
                } else {
                    t.to_i64()
                        .ok_or(TagchipperError::TokenOutOfRange(token_index(t)))
                }
            })
            .collect::<TCResult<Vec<_>>>()?;

        Ok(EncodedLabels {
            labels,
            token_count,
            truncated,
        })
    }

    /// Encode a batch of targets.
    pub fn encode_batch<S>(
        &self,
        targets: &[S],
    ) -> TCResult<Vec<EncodedLabels>>
    where
        S: AsRef<str> + Sync,
    {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                let iter = targets.par_iter();
            } else {
                let iter = targets.iter();
            }
        }
        iter.map(|t| self.encode(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Receipt, TagGrammar};
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::{ByteTokenizer, TagVocab};

    fn tokenizer() -> Arc<dyn BaseTokenizer<u32>> {
        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        TagVocab::register(&TagGrammar::receipt(), &mut tokenizer).unwrap();
        Arc::new(tokenizer)
    }

    #[test]
    fn test_options() {
        let options = LabelEncoderOptions::default();
        assert_eq!(options.max_length, 1000);
        assert_eq!(options.ignore_id, -100);

        let options = options.with_max_length(8).with_ignore_id(-1);
        assert_eq!(options, LabelEncoderOptions {
            max_length: 8,
            ignore_id: -1
        });
    }

    #[test]
    fn test_encode_pads_with_ignore() {
        let tokenizer = tokenizer();
        let encoder =
            LabelEncoder::new(tokenizer.clone(), LabelEncoderOptions::default().with_max_length(16))
                .unwrap();
        check_is_send(&encoder);
        check_is_sync(&encoder);

        let target = "<s><s_total>1.5</s_total></s>";
        let encoded = encoder.encode(target).unwrap();

        assert_eq!(encoded.labels.len(), 16);
        assert_eq!(encoded.token_count, 7);
        assert!(!encoded.truncated);

        let tokens = tokenizer.encode(target).unwrap();
        for (label, token) in encoded.labels.iter().zip(tokens.iter()) {
            assert_eq!(*label, *token as LabelId);
        }
        assert!(encoded.labels[7..].iter().all(|&l| l == -100));
    }

    #[test]
    fn test_encode_truncates() {
        let encoder = LabelEncoder::new(
            tokenizer(),
            LabelEncoderOptions::default().with_max_length(10),
        )
        .unwrap();

        let target = Receipt::new("ACME", "2024-01-01", "", "10.00").tagged();
        let encoded = encoder.encode(&target).unwrap();

        assert!(encoded.truncated);
        assert_eq!(encoded.token_count, 10);
        assert_eq!(encoded.labels.len(), 10);
        assert!(encoded.labels.iter().all(|&l| l != -100));
    }

    #[test]
    fn test_pad_in_content_is_masked() {
        let encoder = LabelEncoder::new(
            tokenizer(),
            LabelEncoderOptions::default().with_max_length(6),
        )
        .unwrap();

        let encoded = encoder.encode("a<pad>b").unwrap();
        assert_eq!(encoded.token_count, 3);
        assert_eq!(encoded.labels[1], -100);
        assert_eq!(encoded.labels.iter().filter(|&&l| l == -100).count(), 4);
    }

    #[test]
    fn test_invalid_options() {
        assert!(matches!(
            LabelEncoder::new(tokenizer(), LabelEncoderOptions::default().with_max_length(0)),
            Err(TagchipperError::InvalidMaxLength)
        ));
        assert!(matches!(
            LabelEncoder::new(tokenizer(), LabelEncoderOptions::default().with_ignore_id(5)),
            Err(TagchipperError::InvalidIgnoreId { ignore_id: 5, .. })
        ));
        assert!(
            LabelEncoder::new(tokenizer(), LabelEncoderOptions::default().with_ignore_id(268))
                .is_ok()
        );
    }

    #[test]
    fn test_encode_batch() {
        let encoder = LabelEncoder::new(
            tokenizer(),
            LabelEncoderOptions::default().with_max_length(32),
        )
        .unwrap();

        let targets = vec!["<s>a</s>", "<s>bb</s>"];
        let batch = encoder.encode_batch(&targets).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].token_count, 3);
        assert_eq!(batch[1].token_count, 4);
        assert_eq!(batch[1], encoder.encode("<s>bb</s>").unwrap());
    }
}
