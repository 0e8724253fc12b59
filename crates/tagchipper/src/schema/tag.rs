//! # Structural Tags

use core::fmt::{Display, Formatter};
use core::str::FromStr;

use strum::EnumCount;

use crate::schema::Field;

/// The sequence-start sentinel text.
pub const START_TAG: &str = "<s>";

/// The sequence-end sentinel text.
pub const END_TAG: &str = "</s>";

/// The number of distinct tags: the two sentinels, and an open/close pair per field.
pub const TAG_COUNT: usize = 2 + 2 * Field::COUNT;

/// A structural marker in the tagged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// The sequence-start sentinel, `<s>`.
    Start,

    /// The sequence-end sentinel, `</s>`.
    End,

    /// A field open tag, `<s_{field}>`.
    Open(Field),

    /// A field close tag, `</s_{field}>`.
    Close(Field),
}

impl Tag {
    /// Iterate over every tag, sentinels first.
    pub fn all() -> impl Iterator<Item = Tag> {
        (0..TAG_COUNT).filter_map(Tag::from_index)
    }

    /// The dense index of this tag in ``0..TAG_COUNT``.
    pub fn index(self) -> usize {
        match self {
            Tag::Start => 0,
            Tag::End => 1,
            Tag::Open(field) => 2 + 2 * field.ordinal(),
            Tag::Close(field) => 3 + 2 * field.ordinal(),
        }
    }

    /// Look up a tag by dense index.
    pub fn from_index(index: usize) -> Option<Tag> {
        match index {
            0 => Some(Tag::Start),
            1 => Some(Tag::End),
            i if i < TAG_COUNT => {
                let field = Field::from_ordinal((i - 2) / 2)?;
                Some(if i % 2 == 0 {
                    Tag::Open(field)
                } else {
                    Tag::Close(field)
                })
            }
            _ => None,
        }
    }

    /// The field this tag brackets, if any.
    pub fn field(self) -> Option<Field> {
        match self {
            Tag::Open(field) | Tag::Close(field) => Some(field),
            Tag::Start | Tag::End => None,
        }
    }

    /// Is this a closing tag (a field close, or the end sentinel)?
    pub fn is_closing(self) -> bool {
        matches!(self, Tag::Close(_) | Tag::End)
    }

    /// The text form of the tag.
    pub fn text(self) -> String {
        match self {
            Tag::Start => START_TAG.to_string(),
            Tag::End => END_TAG.to_string(),
            Tag::Open(field) => format!("<s_{}>", field.name()),
            Tag::Close(field) => format!("</s_{}>", field.name()),
        }
    }
}

impl Display for Tag {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(&self.text())
    }
}

impl FromStr for Tag {
    type Err = crate::TagchipperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            START_TAG => Ok(Tag::Start),
            END_TAG => Ok(Tag::End),
            _ => {
                let (close, name) = if let Some(rest) = s.strip_prefix("</s_") {
                    (true, rest)
                } else if let Some(rest) = s.strip_prefix("<s_") {
                    (false, rest)
                } else {
                    return Err(crate::TagchipperError::Parse(s.to_string()));
                };
                let field = name
                    .strip_suffix('>')
                    .and_then(|n| Field::from_str(n).ok())
                    .ok_or_else(|| crate::TagchipperError::Parse(s.to_string()))?;
                Ok(if close {
                    Tag::Close(field)
                } else {
                    Tag::Open(field)
                })
            }
        }
    }
}
