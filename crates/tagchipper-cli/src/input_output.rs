use std::{
    convert::Infallible,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    str::FromStr,
};

/// A JSONL or text stream: a file, or "-" for stdin/stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreamPath {
    /// stdin or stdout.
    #[default]
    Std,

    /// A filesystem path.
    File(PathBuf),
}

impl FromStr for StreamPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::Std,
            path => Self::File(path.into()),
        })
    }
}

impl StreamPath {
    /// Whether this is the standard stream.
    pub fn is_std(&self) -> bool {
        matches!(self, Self::Std)
    }

    /// Open for buffered line reading.
    pub fn reader(&self) -> std::io::Result<Box<dyn BufRead>> {
        Ok(match self {
            Self::Std => Box::new(BufReader::new(std::io::stdin().lock())),
            Self::File(path) => Box::new(BufReader::new(File::open(path)?)),
        })
    }

    /// Open for buffered writing; files are truncated.
    pub fn writer(&self) -> std::io::Result<Box<dyn Write>> {
        Ok(match self {
            Self::Std => Box::new(BufWriter::new(std::io::stdout().lock())),
            Self::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

/// Input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input file; "-" reads stdin.
    #[clap(long, default_value = "-")]
    pub input: StreamPath,
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file; "-" writes stdout.
    #[clap(long, default_value = "-")]
    pub output: StreamPath,
}
