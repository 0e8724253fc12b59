//! # Tag Schema
//!
//! The static extraction schema:
//! * [`Field`] - the extracted receipt fields, in canonical order.
//! * [`Tag`] - the structural markers; open/close per field, plus the
//!   sequence sentinels.
//! * [`TagSet`] - a bitset over the finite tag universe.
//! * [`TagGrammar`] - the ordered field list and the legal transition table.
//! * [`Receipt`] - the field values, and their canonical tagged string.

pub mod field;
pub mod grammar;
pub mod receipt;
pub mod tag;
pub mod tag_set;

#[doc(inline)]
pub use field::Field;
#[doc(inline)]
pub use grammar::TagGrammar;
#[doc(inline)]
pub use receipt::Receipt;
#[doc(inline)]
pub use tag::Tag;
#[doc(inline)]
pub use tag_set::TagSet;
