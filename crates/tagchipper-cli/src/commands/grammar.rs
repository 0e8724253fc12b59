use std::io::Write;

use tagchipper::{
    schema::{Tag, TagGrammar},
    vocab::TagVocab,
};

use crate::{config::ConfigArgs, input_output::OutputArgs, tokenizer_source::TokenizerArgs};

/// Args for the grammar command.
#[derive(clap::Args, Debug)]
pub struct GrammarArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    tokenizer: TokenizerArgs,

    /// Also print token ids, after registering the tags.
    #[arg(long)]
    ids: bool,

    #[command(flatten)]
    output: OutputArgs,
}

impl GrammarArgs {
    /// Run the grammar command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let (_, grammar) = self.config.load_grammar()?;

        let vocab = if self.ids {
            let mut tokenizer = self.tokenizer.load()?;
            let (vocab, _) = TagVocab::register(&grammar, tokenizer.as_mut())?;
            Some(vocab)
        } else {
            None
        };

        let mut writer = self.output.output.writer()?;
        write_grammar(&mut writer, &grammar, vocab.as_ref())?;
        Ok(())
    }
}

/// Write one ``tag -> next`` line per grammar tag.
fn write_grammar(
    writer: &mut dyn Write,
    grammar: &TagGrammar,
    vocab: Option<&TagVocab<u32>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let label = |tag: Tag| -> Result<String, Box<dyn std::error::Error>> {
        Ok(match vocab {
            Some(vocab) => format!("{tag}({})", vocab.id_of(tag)?),
            None => tag.to_string(),
        })
    };

    for tag in grammar.tags() {
        let next = match grammar.successor(tag)? {
            Some(next) => label(next)?,
            None => "(end)".to_string(),
        };
        writeln!(writer, "{}\t-> {}", label(tag)?, next)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tagchipper::{
        schema::Field,
        vocab::{BaseTokenizer, ByteTokenizer},
    };

    use super::*;

    #[test]
    fn test_write_grammar() {
        let grammar = TagGrammar::new([Field::Total]).unwrap();

        let mut out = Vec::new();
        write_grammar(&mut out, &grammar, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<s>\t-> <s_total>\n<s_total>\t-> </s_total>\n</s_total>\t-> </s>\n</s>\t-> (end)\n"
        );

        let mut tokenizer: ByteTokenizer<u32> = ByteTokenizer::default();
        let (vocab, _) = TagVocab::register(&grammar, &mut tokenizer).unwrap();
        assert_eq!(tokenizer.vocab_size(), 262);

        let mut out = Vec::new();
        write_grammar(&mut out, &grammar, Some(&vocab)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("<s>(1)\t-> <s_total>(260)"));
    }
}
