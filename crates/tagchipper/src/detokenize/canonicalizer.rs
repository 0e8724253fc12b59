//! # Output Canonicalizer

use regex::Regex;

use crate::errors::{TCResult, TagchipperError};
use crate::vocab::byte_tokenizer::PAD_TOKEN;

/// Any structural tag: `<s>`, `</s>`, `<s_name>`, `</s_name>`.
const TAG_THEN_SPACE_PATTERN: &str = r"(</?s(?:_[A-Za-z0-9_]+)?>)\s+";

/// Whitespace ahead of a closing tag: `</s>` or `</s_name>`.
const SPACE_THEN_CLOSE_PATTERN: &str = r"\s+(</s(?:_[A-Za-z0-9_]+)?>)";

/// Normalizes decoded text into canonical tagged form.
///
/// `canonicalize` is idempotent.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    pad_text: String,
    tag_then_space: Regex,
    space_then_close: Regex,
}

impl Default for Canonicalizer {
    /// A canonicalizer for the `<pad>` padding text.
    ///
    /// ## Panics
    /// If the built-in tag patterns fail to compile.
    fn default() -> Self {
        Self::new(PAD_TOKEN).unwrap()
    }
}

fn compile(pattern: &str) -> TCResult<Regex> {
    Regex::new(pattern).map_err(|e| TagchipperError::Parse(e.to_string()))
}

impl Canonicalizer {
    /// Create a canonicalizer.
    ///
    /// ## Arguments
    /// * `pad_text` - The padding token text; empty disables pad removal.
    pub fn new(pad_text: impl Into<String>) -> TCResult<Self> {
        Ok(Self {
            pad_text: pad_text.into(),
            tag_then_space: compile(TAG_THEN_SPACE_PATTERN)?,
            space_then_close: compile(SPACE_THEN_CLOSE_PATTERN)?,
        })
    }

    /// The padding text removed from the output.
    pub fn pad_text(&self) -> &str {
        &self.pad_text
    }

    /// Remove the padding text, including any occurrence that only forms
    /// once an inner one is removed.
    fn strip_pad(
        &self,
        raw: &str,
    ) -> String {
        let mut text = raw.to_string();
        if self.pad_text.is_empty() {
            return text;
        }
        while text.contains(&self.pad_text) {
            text = text.replace(&self.pad_text, "");
        }
        text
    }

    /// Canonicalize one decoded string.
    pub fn canonicalize(
        &self,
        raw: &str,
    ) -> String {
        let text = self.strip_pad(raw);
        let text = self.tag_then_space.replace_all(&text, "$1");
        self.space_then_close
            .replace_all(&text, "$1")
            .into_owned()
    }

    /// Canonicalize a batch of decoded strings.
    pub fn canonicalize_batch<S>(
        &self,
        batch: &[S],
    ) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                let iter = batch.par_iter();
            } else {
                let iter = batch.iter();
            }
        }
        iter.map(|raw| self.canonicalize(raw.as_ref())).collect()
    }
}
