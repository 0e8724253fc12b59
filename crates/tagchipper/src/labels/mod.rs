//! # Training Labels
//!
//! * [`LabelEncoder`] - canonical tagged string to fixed-length label tensor.
//! * [`ReceiptDataset`] - ``(pixels, labels, target)`` training triples.

pub mod dataset;
pub mod label_encoder;

#[doc(inline)]
pub use dataset::{ReceiptDataset, TrainingExample};
#[doc(inline)]
pub use label_encoder::{EncodedLabels, LabelEncoder, LabelEncoderOptions};
