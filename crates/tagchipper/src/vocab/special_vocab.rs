//! # Special Words Vocabulary

use regex::Regex;

use crate::errors::{TCResult, TagchipperError};
use crate::types::{TCHashMap, TokenType};

/// Token vocabulary for atomic special words.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SpecialVocab<T: TokenType> {
    /// The map of special words to tokens.
    word_map: TCHashMap<String, T>,

    /// The reverse map of tokens to special words.
    token_map: TCHashMap<T, String>,
}

impl<T: TokenType> SpecialVocab<T> {
    /// Get the number of special words in the vocab.
    pub fn len(&self) -> usize {
        self.word_map.len()
    }

    /// Check if the vocab is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a word to the vocab.
    ///
    /// ## Arguments
    /// * `word` - The word string to add.
    /// * `token` - The token value to assign to the word.
    ///
    /// ## Returns
    /// `VocabConflict` if the word or the token is already bound
    /// to something else.
    pub fn add_str_word(
        &mut self,
        word: &str,
        token: T,
    ) -> TCResult<()> {
        if let Some(&existing) = self.word_map.get(word) {
            if existing == token {
                return Ok(());
            }
            return Err(TagchipperError::VocabConflict(format!(
                "{word:?} is already bound to {existing}"
            )));
        }
        if let Some(existing) = self.token_map.get(&token) {
            return Err(TagchipperError::VocabConflict(format!(
                "{token} is already bound to {existing:?}"
            )));
        }
        self.word_map.insert(word.to_string(), token);
        self.token_map.insert(token, word.to_string());
        Ok(())
    }

    /// Return the associated token for the word, if any.
    pub fn lookup_token(
        &self,
        word: &str,
    ) -> Option<T> {
        self.word_map.get(word).copied()
    }

    /// Get the associated word for a token, if any.
    pub fn lookup_word(
        &self,
        token: T,
    ) -> Option<&str> {
        self.token_map.get(&token).map(String::as_str)
    }

    /// Get the exact-match union regex for the special words.
    ///
    /// Longer words are tried first, so no word shadows a longer one
    /// sharing its prefix.
    ///
    /// ## Returns
    /// `None` if no special words are present;
    /// and `Some(Regex)` otherwise.
    pub fn special_regex(&self) -> Option<Regex> {
        if self.is_empty() {
            return None;
        }

        let mut words = self.word_map.keys().collect::<Vec<_>>();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let parts = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>();

        // Escaped literals always compile.
        Regex::new(&format!("({})", parts.join("|"))).ok()
    }
}
