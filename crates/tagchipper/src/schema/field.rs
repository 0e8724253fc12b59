//! # Receipt Fields

/// A semantic receipt field.
///
/// Declaration order is the canonical field order;
/// serialization and the grammar never reorder it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// The issuing company.
    Company,

    /// The receipt date.
    Date,

    /// The company address.
    Address,

    /// The receipt total.
    Total,
}

impl Field {
    /// All fields, in canonical order.
    pub const CANONICAL: [Field; 4] = [Field::Company, Field::Date, Field::Address, Field::Total];

    /// The field name, as used in the tag text.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The canonical position of the field.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Look up a field by its canonical position.
    pub fn from_ordinal(ordinal: usize) -> Option<Field> {
        Self::CANONICAL.get(ordinal).copied()
    }
}
