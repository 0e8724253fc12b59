mod canonicalize;
mod grammar;
mod labels;
mod score;

/// Subcommands for tagchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Encode JSONL receipts into label tensors.
    Labels(labels::LabelsArgs),

    /// Canonicalize raw decoded model output, one string per line.
    Canonicalize(canonicalize::CanonicalizeArgs),

    /// Score predictions against references by normalized edit distance.
    Score(score::ScoreArgs),

    /// Print the tag grammar transitions.
    Grammar(grammar::GrammarArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Labels(cmd) => cmd.run(),
            Commands::Canonicalize(cmd) => cmd.run(),
            Commands::Score(cmd) => cmd.run(),
            Commands::Grammar(cmd) => cmd.run(),
        }
    }
}
