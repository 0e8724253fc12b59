mod commands;
mod config;
mod input_output;
mod logging;
mod tokenizer_source;

use clap::{CommandFactory, Parser};
use commands::Commands;

/// tagchipper
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Print the full command-line reference as markdown, and exit.
    #[clap(long, hide = true)]
    pub markdown_help: bool,

    /// Worker threads for batch work; defaults to one per core.
    #[clap(long, global = true)]
    pub threads: Option<usize>,

    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.markdown_help {
        clap_markdown::print_help_markdown::<Args>();
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match &args.command {
        Some(command) => command.run(),
        None => {
            Args::command().print_help()?;
            Ok(())
        }
    }
}
