//! `topflow` command-line interface
//!
//! Reads records from FILE (or stdin), prints the k most frequent with a
//! proportional bar. All input is consumed before anything is printed.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use topflow::config::{
    Algorithm, EngineConfig, HashSeed, DEFAULT_FACTOR, DEFAULT_FILTER_BITS, DEFAULT_K,
    DEFAULT_MAX_RECORD_BYTES,
};
use topflow::input::ReadError;
use topflow::pipeline::{self, Error};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Exact,
    SpaceSaving,
    Filtered,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Exact => Algorithm::Exact,
            AlgorithmArg::SpaceSaving => Algorithm::SpaceSaving,
            AlgorithmArg::Filtered => Algorithm::Filtered,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "topflow", version, about = "Report the most frequent lines of a stream")]
struct Args {
    /// Limit to this many top values
    #[arg(short = 'k', default_value_t = DEFAULT_K)]
    k: usize,

    /// Counting engine
    #[arg(long, value_enum, default_value = "exact")]
    algorithm: AlgorithmArg,

    /// Approximate results via filtered Space-Saving (same as --algorithm filtered)
    #[arg(long, conflicts_with = "algorithm")]
    approx: bool,

    /// Factor by which to scale k for the monitored set
    #[arg(long, visible_alias = "fss-factor", default_value_t = DEFAULT_FACTOR)]
    factor: f64,

    /// Bits to use for the admission filter hash table
    #[arg(long, visible_alias = "fss-bits", default_value_t = DEFAULT_FILTER_BITS)]
    filter_bits: u8,

    /// Seed for the filter hash
    #[arg(long, default_value_t = 0, conflicts_with = "random_seed")]
    seed: u64,

    /// Use a fresh filter hash seed on every run
    #[arg(long)]
    random_seed: bool,

    /// Include the summed count of the remaining values
    #[arg(long)]
    other: bool,

    /// Longest accepted line, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_RECORD_BYTES)]
    max_record_bytes: usize,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Input file (stdin when omitted)
    file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> EngineConfig {
        let algorithm = if self.approx {
            Algorithm::Filtered
        } else {
            self.algorithm.into()
        };
        let seed = if self.random_seed {
            HashSeed::Random
        } else {
            HashSeed::Fixed(self.seed)
        };

        EngineConfig::new(self.k)
            .with_algorithm(algorithm)
            .with_factor(self.factor)
            .with_filter_bits(self.filter_bits)
            .with_seed(seed)
            .with_max_record_bytes(self.max_record_bytes)
            .with_other(self.other)
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<(), Error> {
    let config = args.config();

    let report = match &args.file {
        Some(path) => {
            let file = File::open(path).map_err(|err| {
                ReadError::Io(io::Error::new(
                    err.kind(),
                    format!("failed to open {}: {}", path.display(), err),
                ))
            })?;
            info!(path = %path.display(), "reading file");
            pipeline::run(BufReader::new(file), &config)?
        }
        None => {
            let stdin = io::stdin();
            pipeline::run(stdin.lock(), &config)?
        }
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    report
        .render(&mut out)
        .and_then(|()| out.flush())
        .map_err(ReadError::Io)?;
    Ok(())
}
