//! mmkit CLI - Command-line verifier and proof compressor for Metamath libraries

mod error;
mod format;
mod processor;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use mmkit_proof::{CompressionStrategy, VerifyConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use error::CliError;

/// Exit code when a proof was rejected
const EXIT_FAILED: i32 = 1;
/// Exit code for usage, I/O and snapshot errors
const EXIT_ERROR: i32 = 2;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CliConfig {
    /// Default verbosity level
    #[serde(default)]
    verbosity: Option<String>,
    /// Default output format
    #[serde(default)]
    format: Option<String>,
    /// Default number of threads
    #[serde(default)]
    threads: Option<usize>,
    /// Default decompression cap in labels
    #[serde(default)]
    max_labels: Option<usize>,
}

impl CliConfig {
    /// Load configuration from file
    fn load() -> Self {
        let config_path = dirs::home_dir()
            .map(|mut p| {
                p.push(".mmkitrc");
                p
            })
            .filter(|p| p.exists())
            .or_else(|| {
                dirs::config_dir().map(|mut p| {
                    p.push("mmkit");
                    p.push("config.yaml");
                    p
                })
            });

        if let Some(path) = config_path
            && path.exists()
            && let Ok(contents) = fs::read_to_string(&path)
            && let Ok(config) = serde_yaml::from_str(&contents)
        {
            return config;
        }

        Self::default()
    }

    /// Merge configuration with command-line arguments
    fn merge_with_args(&self, args: &mut Args) {
        // Only apply config if arg is not explicitly set
        if args.verbosity == Verbosity::Normal
            && let Some(ref v) = self.verbosity
        {
            match v.as_str() {
                "quiet" => args.verbosity = Verbosity::Quiet,
                "verbose" => args.verbosity = Verbosity::Verbose,
                "debug" => args.verbosity = Verbosity::Debug,
                "trace" => args.verbosity = Verbosity::Trace,
                _ => {}
            }
        }

        if args.format == OutputFormat::Text
            && let Some(ref f) = self.format
            && f == "json"
        {
            args.format = OutputFormat::Json;
        }

        if args.threads.is_none() {
            args.threads = self.threads;
        }

        if args.max_labels.is_none() {
            args.max_labels = self.max_labels;
        }
    }
}

/// Output format for results
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    /// Human readable text (default)
    Text,
    /// JSON format
    Json,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    /// No output except results
    Quiet,
    /// Minimal output
    Normal,
    /// Detailed output
    Verbose,
    /// Debug output
    Debug,
    /// Trace output
    Trace,
}

/// Back-reference strategy for compression
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum StrategyArg {
    /// Keep compressed proofs, compress others by sentence
    Any,
    /// Never save intermediate steps
    NoBackrefs,
    /// Refer back to identical sentences
    Sentence,
    /// Refer back to identical sub-proofs
    Tree,
}

impl From<StrategyArg> for CompressionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Any => Self::Any,
            StrategyArg::NoBackrefs => Self::NoBackrefs,
            StrategyArg::Sentence => Self::BackrefsOnIdenticalSentence,
            StrategyArg::Tree => Self::BackrefsOnIdenticalTree,
        }
    }
}

/// mmkit - Metamath proof verification and compression
#[derive(Parser, Debug, Clone)]
#[command(name = "mmkit")]
#[command(author = "COOLJAPAN OU (Team KitaSan)")]
#[command(version)]
#[command(about = "Verify, compress and decompress Metamath proofs")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbosity level
    #[arg(short, long, global = true, value_enum, default_value = "normal")]
    verbosity: Verbosity,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Number of worker threads (0 = one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Maximum number of labels a compressed proof may expand to
    #[arg(long, global = true)]
    max_labels: Option<usize>,

    /// Generate shell completion script for the specified shell
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Verify the proofs of a library snapshot
    Verify {
        /// Library snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Only verify these theorems
        #[arg(short, long = "label", value_name = "NAME")]
        labels: Vec<String>,
    },
    /// Print the compressed form of a proof
    Compress {
        /// Library snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Theorem to compress
        #[arg(short, long, value_name = "NAME")]
        label: String,

        /// Back-reference strategy
        #[arg(short, long, value_enum, default_value = "any")]
        strategy: StrategyArg,
    },
    /// Print the uncompressed form of a proof
    Decompress {
        /// Library snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Theorem to decompress
        #[arg(short, long, value_name = "NAME")]
        label: String,
    },
    /// Show proof size statistics
    Stats {
        /// Library snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Back-reference strategy
        #[arg(short, long, value_enum, default_value = "sentence")]
        strategy: StrategyArg,
    },
}

impl Args {
    /// Verification settings derived from the arguments
    fn verify_config(&self) -> VerifyConfig {
        let mut config = VerifyConfig::default();
        if let Some(threads) = self.threads {
            config = config.with_num_threads(threads);
        }
        if let Some(max_labels) = self.max_labels {
            config = config.with_max_decompression_size(max_labels);
        }
        config
    }
}

fn main() {
    let mut args = Args::parse();

    // Handle completion generation
    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return;
    }

    CliConfig::load().merge_with_args(&mut args);

    // Set up logging
    if args.verbosity >= Verbosity::Verbose {
        let level = match args.verbosity {
            Verbosity::Trace => Level::TRACE,
            Verbosity::Debug => Level::DEBUG,
            _ => Level::INFO,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to set tracing subscriber: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_FAILED),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

/// Run the selected command, returning whether every proof was accepted
fn run(args: &Args) -> Result<bool, CliError> {
    let Some(command) = &args.command else {
        return Err(CliError::MissingCommand);
    };
    let config = args.verify_config();
    match command {
        Command::Verify { snapshot, labels } => {
            processor::run_verify(args, snapshot, labels, config)
        }
        Command::Compress {
            snapshot,
            label,
            strategy,
        } => processor::run_compress(args, snapshot, label, (*strategy).into(), &config),
        Command::Decompress { snapshot, label } => {
            processor::run_decompress(args, snapshot, label, &config)
        }
        Command::Stats { snapshot, strategy } => {
            processor::run_stats(args, snapshot, (*strategy).into(), &config)
        }
    }
}
