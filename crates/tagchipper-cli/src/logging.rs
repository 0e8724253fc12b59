use stderrlog::{LogLevelNum, Timestamp};

/// Logging setup arg group.
///
/// Warnings (truncated targets, new tag tokens) show by default;
/// `-v` adds per-prediction scores, `-vv` registration and truncation detail.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// More detail on stderr (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable timestamped logging.
    #[clap(long)]
    pub ts: bool,
}

impl LogArgs {
    fn level(&self) -> LogLevelNum {
        match self.verbose {
            0 => LogLevelNum::Warn,
            1 => LogLevelNum::Info,
            2 => LogLevelNum::Debug,
            _ => LogLevelNum::Trace,
        }
    }

    /// Install the stderr logger.
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(self.level())
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;
        Ok(())
    }
}
