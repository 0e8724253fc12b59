//! # Pixel Tensors
//!
//! Image preprocessing is an external collaborator; this crate only
//! moves its output between the dataset and the sequence model.

use crate::errors::{TCResult, TagchipperError};

/// A dense, row-major ``f32`` tensor of image pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelTensor {
    /// The tensor shape, outermost first.
    pub shape: Vec<usize>,

    /// The flat tensor data.
    pub data: Vec<f32>,
}

impl PixelTensor {
    /// Build a tensor, checking the data length against the shape.
    pub fn new(
        shape: Vec<usize>,
        data: Vec<f32>,
    ) -> TCResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(TagchipperError::BatchLengthMismatch {
                left: expected,
                right: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Is the tensor empty?
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The image-to-pixel-tensor collaborator.
pub trait PixelSource: Send + Sync {
    /// Load and preprocess an image.
    ///
    /// ## Arguments
    /// * `image` - The receipt's opaque image reference.
    /// * `training` - Whether training-time augmentation (e.g. random padding) applies.
    fn pixels(
        &self,
        image: Option<&str>,
        training: bool,
    ) -> TCResult<PixelTensor>;
}
