use std::{
    io::{BufRead, Write},
    sync::Arc,
};

use tagchipper::{
    labels::{EncodedLabels, LabelEncoder},
    schema::{Receipt, TagGrammar},
    vocab::{BaseTokenizer, TagVocab},
};

use crate::{
    config::ConfigArgs,
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    tokenizer_source::TokenizerArgs,
};

/// Args for the labels command.
#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    tokenizer: TokenizerArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// One output line.
#[derive(serde::Serialize)]
struct LabelRecord<'a> {
    target: &'a str,

    #[serde(flatten)]
    encoded: &'a EncodedLabels,
}

impl LabelsArgs {
    /// Run the labels command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.init()?;

        let (options, grammar) = self.config.load_grammar()?;

        let mut tokenizer = self.tokenizer.load()?;
        let (_, added) = TagVocab::register(&grammar, tokenizer.as_mut())?;
        if added > 0 {
            log::info!(
                "added {added} tag tokens; vocab size is now {}",
                tokenizer.vocab_size()
            );
        }
        let tokenizer: Arc<dyn BaseTokenizer<u32>> = Arc::from(tokenizer);
        let encoder = LabelEncoder::new(tokenizer, options.labels)?;

        let mut reader = self.input.input.reader()?;
        let mut writer = self.output.output.writer()?;
        let count = write_labels(&mut reader, &mut writer, &grammar, &encoder)?;
        log::info!("encoded {count} receipts");

        Ok(())
    }
}

/// Encode every JSONL receipt in `reader` as a JSONL label record.
fn write_labels(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    grammar: &TagGrammar,
    encoder: &LabelEncoder<u32>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let receipt: Receipt = serde_json::from_str(&line)?;
        targets.push(receipt.tagged_with(grammar));
    }

    let encoded = encoder.encode_batch(&targets)?;
    let truncated = encoded.iter().filter(|e| e.truncated).count();
    if truncated > 0 {
        log::warn!("{truncated} of {} targets were truncated", targets.len());
    }

    for (target, encoded) in targets.iter().zip(&encoded) {
        serde_json::to_writer(&mut *writer, &LabelRecord { target, encoded })?;
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(targets.len())
}
