//! # Receipt Records

use crate::schema::{Field, Tag, TagGrammar};

/// A receipt: an opaque image reference, and the four extracted fields.
///
/// Deserializes from the entity JSON form:
/// ```json
/// {"company": "ACME", "date": "2024-01-01", "address": "1 Main St", "total": "10.00"}
/// ```
/// A missing `address` is read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Receipt {
    /// Opaque image reference; resolved by the pixel source collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// The issuing company.
    pub company: String,

    /// The receipt date.
    pub date: String,

    /// The company address.
    #[serde(default)]
    pub address: String,

    /// The receipt total.
    pub total: String,
}

impl Receipt {
    /// Create a receipt with no image reference.
    pub fn new(
        company: impl Into<String>,
        date: impl Into<String>,
        address: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            image: None,
            company: company.into(),
            date: date.into(),
            address: address.into(),
            total: total.into(),
        }
    }

    /// Attach an image reference.
    pub fn with_image(
        self,
        image: impl Into<String>,
    ) -> Self {
        Self {
            image: Some(image.into()),
            ..self
        }
    }

    /// Get the text of a field.
    pub fn field(
        &self,
        field: Field,
    ) -> &str {
        match field {
            Field::Company => &self.company,
            Field::Date => &self.date,
            Field::Address => &self.address,
            Field::Total => &self.total,
        }
    }

    /// The canonical tagged string under the full receipt grammar.
    ///
    /// This is both the training target and the inference reference.
    pub fn tagged(&self) -> String {
        self.tagged_with(&TagGrammar::receipt())
    }

    /// The canonical tagged string under the given grammar.
    pub fn tagged_with(
        &self,
        grammar: &TagGrammar,
    ) -> String {
        let mut buf = String::new();
        for tag in grammar.tags() {
            buf.push_str(&tag.text());
            if let Tag::Open(field) = tag {
                buf.push_str(self.field(field));
            }
        }
        buf
    }
}
