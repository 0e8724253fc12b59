use std::io::{BufRead, Write};

use tagchipper::{
    detokenize::Canonicalizer,
    evaluation::{EvaluationReport, evaluate_batch},
};

use crate::{
    input_output::{OutputArgs, StreamPath},
    logging::LogArgs,
};

/// Args for the score command.
#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// Predictions file, one tagged string per line; "-" for stdin.
    predictions: StreamPath,

    /// References file, one tagged string per line; "-" for stdin.
    references: StreamPath,

    /// Canonicalize the predictions before scoring.
    #[arg(long)]
    canonicalize: bool,

    #[command(flatten)]
    output: OutputArgs,
}

impl ScoreArgs {
    /// Run the score command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.init()?;

        if self.predictions.is_std() && self.references.is_std() {
            return Err("only one of predictions and references may be stdin".into());
        }
        let predictions = read_lines(self.predictions.reader()?.as_mut())?;
        let references = read_lines(self.references.reader()?.as_mut())?;

        let canon = if self.canonicalize {
            Some(Canonicalizer::default())
        } else {
            None
        };
        let report = score(predictions, &references, canon.as_ref())?;
        report.log_items();
        log::info!("mean normalized edit distance: {}", report.mean);

        let mut writer = self.output.output.writer()?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

fn read_lines(reader: &mut dyn BufRead) -> Result<Vec<String>, std::io::Error> {
    reader.lines().collect()
}

fn score(
    predictions: Vec<String>,
    references: &[String],
    canon: Option<&Canonicalizer>,
) -> tagchipper::TCResult<EvaluationReport> {
    let predictions = match canon {
        Some(canon) => canon.canonicalize_batch(&predictions),
        None => predictions,
    };
    evaluate_batch(&predictions, references)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tagchipper::TagchipperError;

    use super::*;

    #[test]
    fn test_score() {
        let predictions = read_lines(&mut Cursor::new("<s_total> 10.0 </s_total>\nabc\n")).unwrap();
        let references = vec!["<s_total>10.00</s_total>".to_string(), "abc".to_string()];

        let report = score(predictions.clone(), &references, Some(&Canonicalizer::default())).unwrap();
        assert_eq!(report.items[0].prediction, "<s_total>10.0</s_total>");
        assert!((report.items[0].score - 1.0 / 24.0).abs() < 1e-12);
        assert_eq!(report.items[1].score, 0.0);

        let raw = score(predictions, &references, None).unwrap();
        assert!(raw.items[0].score > report.items[0].score);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            score(vec!["a".to_string()], &[], None),
            Err(TagchipperError::BatchLengthMismatch { left: 1, right: 0 })
        ));
    }
}
