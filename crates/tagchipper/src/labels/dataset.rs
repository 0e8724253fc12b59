//! # Receipt Training Dataset

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{TCResult, TagchipperError};
use crate::labels::LabelEncoder;
use crate::pixels::{PixelSource, PixelTensor};
use crate::schema::{Receipt, TagGrammar};
use crate::types::{LabelId, TokenType};

/// A supervised training example.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    /// The preprocessed image.
    pub pixel_values: PixelTensor,

    /// The label tensor.
    pub labels: Vec<LabelId>,

    /// The canonical tagged string the labels encode.
    pub target: String,
}

/// An indexed set of receipts, producing [`TrainingExample`]s.
pub struct ReceiptDataset<T: TokenType> {
    receipts: Vec<Receipt>,
    grammar: Arc<TagGrammar>,
    encoder: LabelEncoder<T>,
    pixels: Arc<dyn PixelSource>,
    training: bool,
    truncated: AtomicUsize,
}

impl<T: TokenType> ReceiptDataset<T> {
    /// Create a dataset.
    ///
    /// ## Arguments
    /// * `receipts` - The receipts.
    /// * `grammar` - The grammar used to build the targets.
    /// * `encoder` - The label encoder.
    /// * `pixels` - The image preprocessing collaborator.
    /// * `training` - Whether examples are for training (enables augmentation).
    pub fn new(
        receipts: Vec<Receipt>,
        grammar: Arc<TagGrammar>,
        encoder: LabelEncoder<T>,
        pixels: Arc<dyn PixelSource>,
        training: bool,
    ) -> Self {
        Self {
            receipts,
            grammar,
            encoder,
            pixels,
            training,
            truncated: AtomicUsize::new(0),
        }
    }

    /// The number of receipts.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    /// Is the dataset empty?
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// The receipts.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// The number of truncated label targets produced so far.
    pub fn truncated_count(&self) -> usize {
        self.truncated.load(Ordering::Relaxed)
    }

    /// The canonical target string of a receipt.
    pub fn target(
        &self,
        index: usize,
    ) -> TCResult<String> {
        Ok(self.receipt(index)?.tagged_with(&self.grammar))
    }

    fn receipt(
        &self,
        index: usize,
    ) -> TCResult<&Receipt> {
        self.receipts
            .get(index)
            .ok_or(TagchipperError::IndexOutOfRange {
                index,
                len: self.receipts.len(),
            })
    }

    /// Build the training example at `index`.
    pub fn get(
        &self,
        index: usize,
    ) -> TCResult<TrainingExample> {
        let receipt = self.receipt(index)?;
        let target = receipt.tagged_with(&self.grammar);

        let pixel_values = self
            .pixels
            .pixels(receipt.image.as_deref(), self.training)?;

        let encoded = self.encoder.encode(&target)?;
        if encoded.truncated {
            let count = self.truncated.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("receipt {index} label target truncated ({count} so far)");
        }

        Ok(TrainingExample {
            pixel_values,
            labels: encoded.labels,
            target,
        })
    }
}
