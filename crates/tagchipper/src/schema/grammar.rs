//! # Tag Transition Grammar

use strum::EnumCount;

use crate::errors::{TCResult, TagchipperError};
use crate::schema::{Field, Tag, TagSet};

/// The tag grammar: an ordered field list bracketed by the sentinels.
///
/// The legal sequence of structural tags is the chain:
///
/// ```text
/// <s> <s_f1> </s_f1> <s_f2> </s_f2> ... <s_fn> </s_fn> </s>
/// ```
///
/// Every tag except [`Tag::End`] has exactly one legal successor;
/// [`Tag::End`] is terminal.
///
/// A grammar is immutable once built; share it by reference or `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGrammar {
    fields: Vec<Field>,

    /// Position of each field in `fields`, indexed by [`Field::ordinal`].
    positions: [Option<usize>; Field::COUNT],
}

impl Default for TagGrammar {
    fn default() -> Self {
        Self::receipt()
    }
}

impl TagGrammar {
    /// The canonical four-field receipt grammar.
    pub fn receipt() -> Self {
        Self::build(Field::CANONICAL.to_vec())
    }

    /// Build a grammar over a subset of the fields.
    ///
    /// ## Arguments
    /// * `fields` - The fields, in canonical relative order.
    ///
    /// ## Returns
    /// A new `TagGrammar`; or `InvalidGrammar` if `fields` is empty,
    /// repeats a field, or is out of canonical order.
    pub fn new<I>(fields: I) -> TCResult<Self>
    where
        I: IntoIterator<Item = Field>,
    {
        let fields = fields.into_iter().collect::<Vec<_>>();
        if fields.is_empty() {
            return Err(TagchipperError::InvalidGrammar(
                "grammar needs at least one field".to_string(),
            ));
        }
        if let Some(w) = fields.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TagchipperError::InvalidGrammar(format!(
                "fields must be unique and in canonical order: {} before {}",
                w[0], w[1]
            )));
        }
        Ok(Self::build(fields))
    }

    fn build(fields: Vec<Field>) -> Self {
        let mut positions = [None; Field::COUNT];
        for (pos, field) in fields.iter().enumerate() {
            positions[field.ordinal()] = Some(pos);
        }
        Self { fields, positions }
    }

    /// The fields, in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Is the tag part of this grammar?
    pub fn contains(
        &self,
        tag: Tag,
    ) -> bool {
        match tag.field() {
            Some(field) => self.positions[field.ordinal()].is_some(),
            None => true,
        }
    }

    /// The grammar tags, in the order a valid sequence emits them.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        core::iter::once(Tag::Start)
            .chain(
                self.fields
                    .iter()
                    .flat_map(|&f| [Tag::Open(f), Tag::Close(f)]),
            )
            .chain(core::iter::once(Tag::End))
    }

    /// The set of all tags in this grammar.
    pub fn tag_set(&self) -> TagSet {
        self.tags().collect()
    }

    fn position(
        &self,
        tag: Tag,
        field: Field,
    ) -> TCResult<usize> {
        self.positions[field.ordinal()].ok_or(TagchipperError::UnknownState { tag })
    }

    /// The successor of a tag in the chain.
    ///
    /// ## Returns
    /// `Some(next)`; `None` for the terminal [`Tag::End`];
    /// or `UnknownState` if the tag is not part of this grammar.
    pub fn successor(
        &self,
        tag: Tag,
    ) -> TCResult<Option<Tag>> {
        Ok(match tag {
            Tag::Start => Some(Tag::Open(self.fields[0])),
            Tag::Open(field) => {
                self.position(tag, field)?;
                Some(Tag::Close(field))
            }
            Tag::Close(field) => {
                let pos = self.position(tag, field)?;
                Some(
                    self.fields
                        .get(pos + 1)
                        .map_or(Tag::End, |&next| Tag::Open(next)),
                )
            }
            Tag::End => None,
        })
    }

    /// The set of tags which may legally follow `tag`.
    ///
    /// ## Returns
    /// The successor set; empty only for [`Tag::End`];
    /// or `UnknownState` if the tag is not part of this grammar.
    pub fn legal_next(
        &self,
        tag: Tag,
    ) -> TCResult<TagSet> {
        Ok(self.successor(tag)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_transitions() {
        use Field::*;
        let grammar = TagGrammar::receipt();

        let expected = [
            (Tag::Start, Some(Tag::Open(Company))),
            (Tag::Open(Company), Some(Tag::Close(Company))),
            (Tag::Close(Company), Some(Tag::Open(Date))),
            (Tag::Open(Date), Some(Tag::Close(Date))),
            (Tag::Close(Date), Some(Tag::Open(Address))),
            (Tag::Open(Address), Some(Tag::Close(Address))),
            (Tag::Close(Address), Some(Tag::Open(Total))),
            (Tag::Open(Total), Some(Tag::Close(Total))),
            (Tag::Close(Total), Some(Tag::End)),
            (Tag::End, None),
        ];

        for (tag, next) in expected {
            assert_eq!(grammar.successor(tag).unwrap(), next, "{tag}");
            let legal = grammar.legal_next(tag).unwrap();
            assert_eq!(legal.iter().next(), next);
            assert_eq!(legal.len(), next.iter().count());
        }
    }

    #[test]
    fn test_only_end_is_terminal() {
        let grammar = TagGrammar::receipt();
        for tag in grammar.tags() {
            let legal = grammar.legal_next(tag).unwrap();
            assert_eq!(legal.is_empty(), tag == Tag::End, "{tag}");
        }
    }

    #[test]
    fn test_tags_follow_chain() {
        let grammar = TagGrammar::receipt();
        let tags = grammar.tags().collect::<Vec<_>>();
        assert_eq!(tags.len(), 10);
        for w in tags.windows(2) {
            assert_eq!(grammar.successor(w[0]).unwrap(), Some(w[1]));
        }
        assert_eq!(grammar.tag_set().len(), 10);
    }

    #[test]
    fn test_subset_grammar() {
        let grammar = TagGrammar::new([Field::Date, Field::Total]).unwrap();
        assert_eq!(grammar.fields(), &[Field::Date, Field::Total]);

        assert_eq!(
            grammar.successor(Tag::Start).unwrap(),
            Some(Tag::Open(Field::Date))
        );
        assert_eq!(
            grammar.successor(Tag::Close(Field::Date)).unwrap(),
            Some(Tag::Open(Field::Total))
        );
        assert!(grammar.contains(Tag::End));
        assert!(!grammar.contains(Tag::Open(Field::Company)));

        assert!(matches!(
            grammar.legal_next(Tag::Open(Field::Company)),
            Err(TagchipperError::UnknownState { tag: Tag::Open(Field::Company) })
        ));
    }

    #[test]
    fn test_invalid_grammar() {
        assert!(matches!(
            TagGrammar::new(Vec::<Field>::new()),
            Err(TagchipperError::InvalidGrammar(_))
        ));
        assert!(matches!(
            TagGrammar::new([Field::Date, Field::Date]),
            Err(TagchipperError::InvalidGrammar(_))
        ));
        assert!(matches!(
            TagGrammar::new([Field::Total, Field::Company]),
            Err(TagchipperError::InvalidGrammar(_))
        ));
        assert_eq!(
            TagGrammar::new(Field::CANONICAL).unwrap(),
            TagGrammar::receipt()
        );
    }
}
