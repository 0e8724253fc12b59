use std::io::{BufRead, Write};

use tagchipper::detokenize::Canonicalizer;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Args for the canonicalize command.
#[derive(clap::Args, Debug)]
pub struct CanonicalizeArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    /// The padding token text to strip.
    #[arg(long, default_value = "<pad>")]
    pad: String,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl CanonicalizeArgs {
    /// Run the canonicalize command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.init()?;

        let canon = Canonicalizer::new(self.pad.as_str())?;

        let mut reader = self.input.input.reader()?;
        let mut writer = self.output.output.writer()?;
        let count = canonicalize_lines(&mut reader, &mut writer, &canon)?;
        log::debug!("canonicalized {count} lines");

        Ok(())
    }
}

fn canonicalize_lines(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    canon: &Canonicalizer,
) -> Result<usize, Box<dyn std::error::Error>> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    for line in canon.canonicalize_batch(&lines) {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_canonicalize_lines() {
        let mut reader = Cursor::new("<s_company> ACME </s_company> <pad><pad>\n<s> <s_total>1</s_total>\n");
        let mut out = Vec::new();

        let count = canonicalize_lines(&mut reader, &mut out, &Canonicalizer::default()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<s_company>ACME</s_company>\n<s><s_total>1</s_total>\n"
        );
    }
}
