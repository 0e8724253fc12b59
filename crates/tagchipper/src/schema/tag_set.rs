//! # Tag Bitset

use core::fmt::{Debug, Formatter};

use crate::schema::Tag;
use crate::schema::tag::TAG_COUNT;

const _: () = assert!(TAG_COUNT <= u16::BITS as usize);

/// A set of [`Tag`]s, as a bitset over [`Tag::index`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u16);

impl TagSet {
    /// The empty set.
    pub const EMPTY: TagSet = TagSet(0);

    /// A set containing exactly one tag.
    pub fn single(tag: Tag) -> Self {
        let mut set = Self::EMPTY;
        set.insert(tag);
        set
    }

    /// Add a tag to the set.
    pub fn insert(
        &mut self,
        tag: Tag,
    ) {
        self.0 |= 1 << tag.index();
    }

    /// Is the tag in the set?
    pub fn contains(
        &self,
        tag: Tag,
    ) -> bool {
        self.0 & (1 << tag.index()) != 0
    }

    /// The number of tags in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the tags in the set, in index order.
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::all().filter(|&tag| self.contains(tag))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl Debug for TagSet {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[test]
    fn test_tag_set() {
        let mut set = TagSet::EMPTY;
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);

        set.insert(Tag::Close(Field::Total));
        set.insert(Tag::Start);
        set.insert(Tag::Start);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Tag::Start));
        assert!(set.contains(Tag::Close(Field::Total)));
        assert!(!set.contains(Tag::End));

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Tag::Start, Tag::Close(Field::Total)]
        );

        let rebuild: TagSet = set.iter().collect();
        assert_eq!(rebuild, set);
        assert_eq!(TagSet::single(Tag::End).len(), 1);
    }
}
