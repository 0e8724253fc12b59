//! # Tag Vocabulary Extension

use crate::errors::{TCResult, TagchipperError};
use crate::schema::tag::TAG_COUNT;
use crate::schema::{Tag, TagGrammar, TagSet};
use crate::types::{TCHashMap, TokenType};
use crate::vocab::BaseTokenizer;

/// The bijection between grammar tags and their token ids.
///
/// Ids in this map are *structural*; every other id is free text.
/// Immutable once built; share by `Arc` across generations.
#[derive(Debug, Clone, PartialEq)]
pub struct TagVocab<T: TokenType> {
    /// Token id per tag, indexed by [`Tag::index`].
    ids: [Option<T>; TAG_COUNT],

    /// Reverse map of structural ids.
    tags: TCHashMap<T, Tag>,
}

impl<T: TokenType> TagVocab<T> {
    /// Register every grammar tag in the tokenizer, and build the vocab.
    ///
    /// Tags already present keep their ids; re-running registration adds nothing.
    ///
    /// ## Arguments
    /// * `grammar` - The tag grammar.
    /// * `tokenizer` - The base tokenizer to extend.
    ///
    /// ## Returns
    /// The vocab, and the number of newly created ids.
    /// A non-zero count means the model embeddings must be resized.
    pub fn register<B>(
        grammar: &TagGrammar,
        tokenizer: &mut B,
    ) -> TCResult<(Self, usize)>
    where
        B: BaseTokenizer<T> + ?Sized,
    {
        let missing = grammar
            .tags()
            .map(Tag::text)
            .filter(|text| tokenizer.token_to_id(text).is_none())
            .collect::<Vec<_>>();

        let added = if missing.is_empty() {
            0
        } else {
            tokenizer.add_special_tokens(&missing)
        };
        if added > 0 {
            log::debug!("registered {added} new tag tokens: {missing:?}");
        }

        let vocab = Self::from_tokenizer(grammar, tokenizer)?;
        Ok((vocab, added))
    }

    /// Build the vocab from a tokenizer which already holds every tag.
    ///
    /// ## Returns
    /// `VocabConflict` if a tag is missing, or two tags share an id.
    pub fn from_tokenizer<B>(
        grammar: &TagGrammar,
        tokenizer: &B,
    ) -> TCResult<Self>
    where
        B: BaseTokenizer<T> + ?Sized,
    {
        Self::from_pairs(grammar.tags().map(|tag| (tag, tokenizer.token_to_id(&tag.text()))))
    }

    /// Build the vocab from explicit ``(tag, id)`` pairs.
    ///
    /// A `None` id is reported as a missing tag.
    pub fn from_pairs<I>(pairs: I) -> TCResult<Self>
    where
        I: IntoIterator<Item = (Tag, Option<T>)>,
    {
        let mut ids = [None; TAG_COUNT];
        let mut tags: TCHashMap<T, Tag> = Default::default();

        for (tag, id) in pairs {
            let id = id.ok_or_else(|| {
                TagchipperError::VocabConflict(format!("tag {tag} is not in the vocabulary"))
            })?;
            if let Some(other) = tags.insert(id, tag)
                && other != tag
            {
                return Err(TagchipperError::VocabConflict(format!(
                    "tags {other} and {tag} share token {id}"
                )));
            }
            ids[tag.index()] = Some(id);
        }

        Ok(Self { ids, tags })
    }

    /// The id of a tag.
    ///
    /// ## Returns
    /// `UnknownState` if the tag is not part of the registered grammar.
    pub fn id_of(
        &self,
        tag: Tag,
    ) -> TCResult<T> {
        self.ids[tag.index()].ok_or(TagchipperError::UnknownState { tag })
    }

    /// The tag of an id; `None` for free-text ids.
    pub fn tag_of(
        &self,
        id: T,
    ) -> Option<Tag> {
        self.tags.get(&id).copied()
    }

    /// Is this a structural (tag) id?
    pub fn is_structural(
        &self,
        id: T,
    ) -> bool {
        self.tags.contains_key(&id)
    }

    /// Iterate over ``(tag, id)`` pairs, in tag index order.
    pub fn structural_ids(&self) -> impl Iterator<Item = (Tag, T)> + '_ {
        Tag::all().filter_map(|tag| self.ids[tag.index()].map(|id| (tag, id)))
    }

    /// The registered tags.
    pub fn tag_set(&self) -> TagSet {
        self.structural_ids().map(|(tag, _)| tag).collect()
    }

    /// The number of structural ids.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Is the vocab empty?
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The largest structural id.
    pub fn max_id(&self) -> Option<T> {
        self.tags.keys().max().copied()
    }
}
