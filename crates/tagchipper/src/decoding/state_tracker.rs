//! # Decoding State Tracker

use crate::errors::{TCResult, TagchipperError};
use crate::schema::Tag;
use crate::types::TokenType;
use crate::vocab::TagVocab;

/// Find the most recently emitted structural tag.
///
/// Scans from the end; generation always starts with the start sentinel,
/// so in a well-formed run the scan stops within the current field.
///
/// ## Returns
/// The last tag; or `NoStructuralTag` if the sequence holds none.
pub fn last_tag<T: TokenType>(
    vocab: &TagVocab<T>,
    ids: &[T],
) -> TCResult<Tag> {
    ids.iter()
        .rev()
        .find_map(|&id| vocab.tag_of(id))
        .ok_or(TagchipperError::NoStructuralTag { len: ids.len() })
}
