//! # Byte-Level Base Tokenizer

use regex::Regex;

use crate::errors::{TCResult, TagchipperError};
use crate::types::{TokenType, token_index};
use crate::vocab::{BaseTokenizer, SpecialTokens, SpecialVocab};

/// The padding token text.
pub const PAD_TOKEN: &str = "<pad>";

/// The unknown token text.
pub const UNK_TOKEN: &str = "<unk>";

/// The number of ids reserved ahead of the byte ids.
const BYTE_OFFSET: usize = 4;

/// A byte-level [`BaseTokenizer`].
///
/// Id layout:
/// * ``0..4`` - `<pad>`, `<s>`, `</s>`, `<unk>`.
/// * ``4..260`` - one id per byte value.
/// * ``260..`` - added special tokens, in insertion order.
///
/// Special tokens are matched atomically before byte encoding.
#[derive(Debug, Clone)]
pub struct ByteTokenizer<T: TokenType> {
    specials: SpecialVocab<T>,
    special_re: Option<Regex>,
    special_tokens: SpecialTokens<T>,
    vocab_size: usize,
}

impl<T: TokenType> Default for ByteTokenizer<T> {
    /// ## Panics
    /// If `T` cannot hold the 260 base ids.
    fn default() -> Self {
        Self::try_new().unwrap()
    }
}

fn to_token<T: TokenType>(id: usize) -> TCResult<T> {
    T::from_usize(id).ok_or(TagchipperError::TokenOutOfRange(id))
}

impl<T: TokenType> ByteTokenizer<T> {
    /// Build a tokenizer with the base special tokens.
    ///
    /// ## Returns
    /// `TokenOutOfRange` if `T` cannot hold the base ids.
    pub fn try_new() -> TCResult<Self> {
        let base = [
            PAD_TOKEN,
            crate::schema::tag::START_TAG,
            crate::schema::tag::END_TAG,
            UNK_TOKEN,
        ];

        let mut specials = SpecialVocab::default();
        for (idx, word) in base.iter().enumerate() {
            specials.add_str_word(word, to_token(idx)?)?;
        }

        let vocab_size = BYTE_OFFSET + 256;
        to_token::<T>(vocab_size - 1)?;

        Ok(Self {
            special_re: specials.special_regex(),
            specials,
            special_tokens: SpecialTokens {
                pad_id: to_token(0)?,
                pad_token: PAD_TOKEN.to_string(),
                bos_id: to_token(1)?,
                eos_id: to_token(2)?,
                unk_id: Some(to_token(3)?),
            },
            vocab_size,
        })
    }

    /// Get the token for a byte value.
    pub fn byte_token(
        &self,
        byte: u8,
    ) -> T {
        // Checked against the vocab size in `try_new`.
        T::from_usize(BYTE_OFFSET + byte as usize).unwrap_or_default()
    }

    /// Get the byte value for a token, if it is a byte token.
    pub fn token_byte(
        &self,
        token: T,
    ) -> Option<u8> {
        token_index(token)
            .checked_sub(BYTE_OFFSET)
            .and_then(|b| u8::try_from(b).ok())
    }

    fn push_bytes(
        &self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        tokens.extend(bytes.iter().map(|&b| self.byte_token(b)));
    }
}

impl<T: TokenType> BaseTokenizer<T> for ByteTokenizer<T> {
    fn special_tokens(&self) -> &SpecialTokens<T> {
        &self.special_tokens
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn token_to_id(
        &self,
        token: &str,
    ) -> Option<T> {
        if let Some(t) = self.specials.lookup_token(token) {
            return Some(t);
        }
        match token.as_bytes() {
            [b] => Some(self.byte_token(*b)),
            _ => None,
        }
    }

    fn id_to_token(
        &self,
        id: T,
    ) -> Option<String> {
        if let Some(word) = self.specials.lookup_word(id) {
            return Some(word.to_string());
        }
        self.token_byte(id).map(|b| {
            if b.is_ascii_graphic() {
                (b as char).to_string()
            } else {
                format!("<0x{b:02X}>")
            }
        })
    }

    fn add_special_tokens(
        &mut self,
        tokens: &[String],
    ) -> usize {
        let mut added = 0;
        for token in tokens {
            if self.specials.lookup_token(token).is_some() {
                continue;
            }
            let Ok(id) = to_token::<T>(self.vocab_size) else {
                log::warn!("token space exhausted; cannot add {token:?}");
                break;
            };
            if self.specials.add_str_word(token, id).is_ok() {
                self.vocab_size += 1;
                added += 1;
            }
        }
        if added > 0 {
            self.special_re = self.specials.special_regex();
        }
        added
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    fn encode(
        &self,
        text: &str,
    ) -> TCResult<Vec<T>> {
        let mut tokens = Vec::with_capacity(text.len());

        let Some(re) = &self.special_re else {
            self.push_bytes(text.as_bytes(), &mut tokens);
            return Ok(tokens);
        };

        let mut last = 0;
        for m in re.find_iter(text) {
            self.push_bytes(&text.as_bytes()[last..m.start()], &mut tokens);
            let token = self
                .specials
                .lookup_token(m.as_str())
                .ok_or_else(|| TagchipperError::VocabConflict(m.as_str().to_string()))?;
            tokens.push(token);
            last = m.end();
        }
        self.push_bytes(&text.as_bytes()[last..], &mut tokens);

        Ok(tokens)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, tokens)))]
    fn decode(
        &self,
        tokens: &[T],
    ) -> TCResult<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if let Some(word) = self.specials.lookup_word(token) {
                buf.extend_from_slice(word.as_bytes());
            } else if let Some(b) = self.token_byte(token) {
                buf.push(b);
            } else {
                return Err(TagchipperError::TokenOutOfRange(token_index(token)));
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout() {
        let tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        assert_eq!(tokenizer.vocab_size(), 260);

        let specials = tokenizer.special_tokens();
        assert_eq!(specials.pad_id, 0);
        assert_eq!(specials.pad_token, "<pad>");
        assert_eq!(specials.bos_id, 1);
        assert_eq!(specials.eos_id, 2);
        assert_eq!(specials.unk_id, Some(3));

        assert_eq!(tokenizer.token_to_id("<s>"), Some(1));
        assert_eq!(tokenizer.token_to_id("a"), Some(4 + b'a' as u32));
        assert_eq!(tokenizer.token_to_id("<s_company>"), None);

        assert_eq!(tokenizer.id_to_token(2).as_deref(), Some("</s>"));
        assert_eq!(tokenizer.id_to_token(4 + b'a' as u32).as_deref(), Some("a"));
        assert_eq!(tokenizer.id_to_token(4 + b' ' as u32).as_deref(), Some("<0x20>"));
        assert_eq!(tokenizer.id_to_token(999), None);
    }

    #[test]
    fn test_too_small_token_type() {
        assert!(matches!(
            ByteTokenizer::<u8>::try_new(),
            Err(TagchipperError::TokenOutOfRange(_))
        ));
    }

    #[test]
    fn test_add_special_tokens() {
        let mut tokenizer: ByteTokenizer<u16> = ByteTokenizer::default();

        let added = tokenizer.add_special_tokens(&["<s_a>".to_string(), "<s>".to_string()]);
        assert_eq!(added, 1);
        assert_eq!(tokenizer.vocab_size(), 261);
        assert_eq!(tokenizer.token_to_id("<s_a>"), Some(260));

        let added = tokenizer.add_special_tokens(&["<s_a>".to_string()]);
        assert_eq!(added, 0);
        assert_eq!(tokenizer.vocab_size(), 261);
    }

    #[test]
    fn test_roundtrip() {
        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        tokenizer.add_special_tokens(&["<s_total>".to_string(), "</s_total>".to_string()]);

        let text = "<s><s_total>10.00 caf\u{e9}</s_total></s>";
        let tokens = tokenizer.encode(text).unwrap();

        assert_eq!(tokens[0], 1);
        assert_eq!(tokens[1], 260);
        assert_eq!(tokens[2], tokenizer.byte_token(b'1'));
        assert_eq!(tokens[tokens.len() - 2], 261);
        assert_eq!(tokens[tokens.len() - 1], 2);
        assert_eq!(tokens.len(), 1 + 1 + "10.00 caf\u{e9}".len() + 1 + 1);

        assert_eq!(tokenizer.decode(&tokens).unwrap(), text);
    }

    #[test]
    fn test_decode_out_of_range() {
        let tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        assert!(matches!(
            tokenizer.decode(&[1, 260]),
            Err(TagchipperError::TokenOutOfRange(260))
        ));
    }

    #[test]
    fn test_decode_batch() {
        let tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        let a = tokenizer.encode("<s>ab").unwrap();
        let b = tokenizer.encode("c<pad>").unwrap();
        assert_eq!(
            tokenizer
                .decode_batch(&[a.as_slice(), b.as_slice()])
                .unwrap(),
            vec!["<s>ab".to_string(), "c<pad>".to_string()]
        );
    }
}
