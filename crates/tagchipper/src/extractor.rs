//! # Receipt Extractor
//!
//! Wires grammar, vocab extension, labels, constrained generation,
//! detokenization, and evaluation together around an external
//! [`SequenceModel`].

use std::sync::Arc;

use crate::decoding::{GenerationOptions, GrammarScorer, GreedyGenerator, SequenceModel};
use crate::detokenize::Detokenizer;
use crate::errors::TCResult;
use crate::evaluation::{EvaluationReport, evaluate_batch};
use crate::labels::{LabelEncoder, LabelEncoderOptions, ReceiptDataset};
use crate::pixels::{PixelSource, PixelTensor};
use crate::schema::{Field, Receipt, TagGrammar};
use crate::types::TokenType;
use crate::vocab::{BaseTokenizer, TagVocab};

/// Options for configuring a [`ReceiptExtractor`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    /// The grammar fields, in canonical order.
    pub fields: Vec<Field>,

    /// Generation options.
    pub generation: GenerationOptions,

    /// Label encoding options.
    pub labels: LabelEncoderOptions,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            fields: Field::CANONICAL.to_vec(),
            generation: GenerationOptions::default(),
            labels: LabelEncoderOptions::default(),
        }
    }
}

impl ExtractorOptions {
    /// Sets the grammar fields.
    pub fn with_fields<I>(
        mut self,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Sets the generation options.
    pub fn with_generation(
        mut self,
        generation: GenerationOptions,
    ) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the label encoding options.
    pub fn with_labels(
        mut self,
        labels: LabelEncoderOptions,
    ) -> Self {
        self.labels = labels;
        self
    }

    /// Build the tag grammar.
    pub fn grammar(&self) -> TCResult<TagGrammar> {
        TagGrammar::new(self.fields.iter().copied())
    }
}

/// Grammar-constrained receipt extraction over a sequence model.
pub struct ReceiptExtractor<T: TokenType> {
    options: ExtractorOptions,
    grammar: Arc<TagGrammar>,
    vocab: Arc<TagVocab<T>>,
    tokenizer: Arc<dyn BaseTokenizer<T>>,
    generator: GreedyGenerator<T>,
    detokenizer: Detokenizer<T>,
    label_encoder: LabelEncoder<T>,
}

impl<T: TokenType> ReceiptExtractor<T> {
    /// Register the grammar tags and prepare the model.
    ///
    /// When registration creates ids, the model embeddings are resized to
    /// the new vocabulary size, once, before any generation.
    ///
    /// ## Arguments
    /// * `options` - The extractor options.
    /// * `tokenizer` - The base tokenizer; extended in place, then shared.
    /// * `model` - The sequence model.
    pub fn setup<B, M>(
        options: ExtractorOptions,
        mut tokenizer: B,
        model: &mut M,
    ) -> TCResult<Self>
    where
        B: BaseTokenizer<T> + 'static,
        M: SequenceModel<T> + ?Sized,
    {
        let grammar = Arc::new(options.grammar()?);

        let (vocab, added) = TagVocab::register(&grammar, &mut tokenizer)?;
        if added > 0 {
            log::warn!(
                "added {added} tag tokens; resizing model embeddings to {}",
                tokenizer.vocab_size()
            );
            model.resize_token_embeddings(tokenizer.vocab_size())?;
        }
        let vocab = Arc::new(vocab);
        let tokenizer: Arc<dyn BaseTokenizer<T>> = Arc::new(tokenizer);

        let generator = GreedyGenerator::new(
            options.generation,
            tokenizer.special_tokens().clone(),
            GrammarScorer::new(grammar.clone(), vocab.clone()),
        )?;
        let detokenizer = Detokenizer::new(tokenizer.clone())?;
        let label_encoder = LabelEncoder::new(tokenizer.clone(), options.labels)?;

        Ok(Self {
            options,
            grammar,
            vocab,
            tokenizer,
            generator,
            detokenizer,
            label_encoder,
        })
    }

    /// The extractor options.
    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// The tag grammar.
    pub fn grammar(&self) -> &Arc<TagGrammar> {
        &self.grammar
    }

    /// The tag vocabulary.
    pub fn vocab(&self) -> &Arc<TagVocab<T>> {
        &self.vocab
    }

    /// The extended tokenizer.
    pub fn tokenizer(&self) -> &Arc<dyn BaseTokenizer<T>> {
        &self.tokenizer
    }

    /// The label encoder.
    pub fn label_encoder(&self) -> &LabelEncoder<T> {
        &self.label_encoder
    }

    /// Build a dataset over this extractor's grammar and label encoder.
    pub fn dataset(
        &self,
        receipts: Vec<Receipt>,
        pixels: Arc<dyn PixelSource>,
        training: bool,
    ) -> ReceiptDataset<T> {
        ReceiptDataset::new(
            receipts,
            self.grammar.clone(),
            self.label_encoder.clone(),
            pixels,
            training,
        )
    }

    /// Generate canonical tagged strings for an image batch.
    pub fn infer<M>(
        &self,
        model: &mut M,
        pixel_values: &PixelTensor,
        batch_size: usize,
    ) -> TCResult<Vec<String>>
    where
        M: SequenceModel<T> + ?Sized,
    {
        let rows = self.generator.generate(model, pixel_values, batch_size)?;
        self.detokenizer.decode_batch(&rows)
    }

    /// Score one validation batch.
    ///
    /// Logs every prediction, its reference, and its score.
    pub fn validate<M, S>(
        &self,
        model: &mut M,
        pixel_values: &PixelTensor,
        references: &[S],
    ) -> TCResult<EvaluationReport>
    where
        M: SequenceModel<T> + ?Sized,
        S: AsRef<str> + Sync,
    {
        let predictions = self.infer(model, pixel_values, references.len())?;
        let report = evaluate_batch(&predictions, references)?;
        report.log_items();
        log::info!("val_edit_distance: {}", report.mean);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TagchipperError;
    use crate::vocab::ByteTokenizer;

    /// Replays fixed targets; records embedding resizes.
    struct ReplayModel {
        targets: Vec<Vec<u32>>,
        vocab_size: usize,
        resizes: Vec<usize>,
    }

    impl SequenceModel<u32> for ReplayModel {
        fn next_token_scores(
            &mut self,
            _pixel_values: &PixelTensor,
            rows: &[Vec<u32>],
        ) -> TCResult<Vec<Vec<f32>>> {
            if rows.len() != self.targets.len() {
                return Err(TagchipperError::External("unexpected batch".to_string()));
            }
            Ok(rows
                .iter()
                .zip(&self.targets)
                .map(|(row, target)| {
                    let mut scores = vec![0.0; self.vocab_size];
                    if let Some(&t) = target.get(row.len()) {
                        scores[t as usize] = 1.0;
                    }
                    scores
                })
                .collect())
        }

        fn resize_token_embeddings(
            &mut self,
            vocab_size: usize,
        ) -> TCResult<()> {
            self.vocab_size = vocab_size;
            self.resizes.push(vocab_size);
            Ok(())
        }
    }

    #[test]
    fn test_setup_resizes_once() {
        let mut model = ReplayModel {
            targets: vec![],
            vocab_size: 260,
            resizes: vec![],
        };

        let extractor = ReceiptExtractor::setup(
            ExtractorOptions::default(),
            ByteTokenizer::<u32>::default(),
            &mut model,
        )
        .unwrap();
        assert_eq!(model.resizes, vec![268]);
        assert_eq!(extractor.tokenizer().vocab_size(), 268);
        assert_eq!(extractor.vocab().len(), 10);

        // An already extended tokenizer needs no resize.
        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        TagVocab::register(&TagGrammar::receipt(), &mut tokenizer).unwrap();
        ReceiptExtractor::setup(ExtractorOptions::default(), tokenizer, &mut model).unwrap();
        assert_eq!(model.resizes, vec![268]);
    }

    #[test]
    fn test_validate() {
        let mut model = ReplayModel {
            targets: vec![],
            vocab_size: 260,
            resizes: vec![],
        };
        let extractor = ReceiptExtractor::setup(
            ExtractorOptions::default(),
            ByteTokenizer::<u32>::default(),
            &mut model,
        )
        .unwrap();

        let exact = Receipt::new("ACME", "2024-01-01", "", "10.00").tagged();
        let close = Receipt::new("ACME", "2024-01-01", "", "10.0").tagged();
        let reference = Receipt::new("ACME", "2024-01-01", "", "10.00").tagged();

        model.targets = [&exact, &close]
            .iter()
            .map(|t| extractor.tokenizer().encode(t).unwrap())
            .collect();

        let report = extractor
            .validate(
                &mut model,
                &PixelTensor::default(),
                &[reference.clone(), reference.clone()],
            )
            .unwrap();
        assert_eq!(report.items[0].prediction, exact);
        assert_eq!(report.items[0].score, 0.0);
        assert_eq!(report.items[1].prediction, close);
        let expected = 1.0 / reference.chars().count() as f64;
        assert!((report.items[1].score - expected).abs() < 1e-12);
        assert!((report.mean - expected / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_subset_fields() {
        let options = ExtractorOptions::default().with_fields([Field::Total]);
        let mut model = ReplayModel {
            targets: vec![],
            vocab_size: 260,
            resizes: vec![],
        };
        let extractor =
            ReceiptExtractor::setup(options, ByteTokenizer::<u32>::default(), &mut model).unwrap();
        assert_eq!(model.resizes, vec![262]);
        assert_eq!(extractor.grammar().fields(), &[Field::Total]);

        let options = ExtractorOptions::default().with_fields(Vec::<Field>::new());
        assert!(matches!(
            ReceiptExtractor::setup(options, ByteTokenizer::<u32>::default(), &mut model),
            Err(TagchipperError::InvalidGrammar(_))
        ));
    }

    #[test]
    fn test_options_json() {
        let options: ExtractorOptions =
            serde_json::from_str(r#"{"fields": ["date", "total"], "generation": {"max_length": 64}}"#)
                .unwrap();
        assert_eq!(options.fields, vec![Field::Date, Field::Total]);
        assert_eq!(options.generation.max_length, 64);
        assert_eq!(options.generation.repetition_penalty, 1.06);
        assert_eq!(options.labels, LabelEncoderOptions::default());
    }
}
