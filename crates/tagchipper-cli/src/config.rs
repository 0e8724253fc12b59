use std::fs::File;

use tagchipper::{
    extractor::ExtractorOptions,
    schema::{Field, TagGrammar},
};

/// Options file arg group.
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Optional JSON options file; unset keys take their defaults.
    #[clap(long, default_value = None)]
    pub config: Option<String>,

    /// Override the grammar fields (comma separated, canonical order).
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<Field>>,

    /// Override the label length.
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl ConfigArgs {
    /// Load the options file, then apply the command-line overrides.
    pub fn load(&self) -> Result<ExtractorOptions, Box<dyn std::error::Error>> {
        let options = match &self.config {
            Some(path) => serde_json::from_reader(File::open(path)?)?,
            None => ExtractorOptions::default(),
        };
        Ok(self.apply(options))
    }

    fn apply(
        &self,
        mut options: ExtractorOptions,
    ) -> ExtractorOptions {
        if let Some(fields) = &self.fields {
            options = options.with_fields(fields.iter().copied());
        }
        if let Some(max_length) = self.max_length {
            options.labels = options.labels.with_max_length(max_length);
            options.generation = options.generation.with_max_length(max_length);
        }
        log::debug!("options: {options:?}");
        options
    }

    /// Load the options, and build the grammar.
    pub fn load_grammar(&self) -> Result<(ExtractorOptions, TagGrammar), Box<dyn std::error::Error>> {
        let options = self.load()?;
        let grammar = options.grammar()?;
        Ok((options, grammar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = ConfigArgs {
            config: None,
            fields: Some(vec![Field::Date, Field::Total]),
            max_length: Some(64),
        };
        let (options, grammar) = args.load_grammar().unwrap();
        assert_eq!(grammar.fields(), &[Field::Date, Field::Total]);
        assert_eq!(options.labels.max_length, 64);
        assert_eq!(options.generation.max_length, 64);
    }

    #[test]
    fn test_defaults() {
        let args = ConfigArgs {
            config: None,
            fields: None,
            max_length: None,
        };
        assert_eq!(args.load().unwrap(), ExtractorOptions::default());
    }
}
