use tagchipper::vocab::{BaseTokenizer, ByteTokenizer};

/// Base tokenizer selection arg group.
#[derive(clap::Args, Debug)]
pub struct TokenizerArgs {
    /// A HuggingFace ``tokenizer.json``; the byte-level tokenizer is used if unset.
    #[cfg(feature = "hf")]
    #[arg(long)]
    pub tokenizer: Option<String>,
}

impl TokenizerArgs {
    /// Load the base tokenizer.
    pub fn load(&self) -> Result<Box<dyn BaseTokenizer<u32>>, Box<dyn std::error::Error>> {
        #[cfg(feature = "hf")]
        if let Some(path) = &self.tokenizer {
            log::info!("loading tokenizer: {path}");
            return Ok(Box::new(tagchipper::vocab::HfTokenizer::from_file(path)?));
        }

        Ok(Box::new(ByteTokenizer::<u32>::try_new()?))
    }
}
