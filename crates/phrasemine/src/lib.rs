//! Library interface for the `phrasemine` CLI.
//!
//! This crate exposes the CLI's argument parser as a library, primarily for
//! documentation generation and testing. The actual entry point is in
//! `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`run`] - Load → mine → write orchestration

pub mod run;

use camino::Utf8PathBuf;
use clap::Parser;
use phrasemine_core::mine::PatternFilter;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

/// Mining strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Seed-and-extend greedy max-phrase mining.
    #[default]
    Greedy,
    /// Depth-first contiguous PrefixSpan mining.
    Prefixspan,
}

/// PrefixSpan output filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PatternMode {
    /// Emit every frequent pattern of sufficient length.
    All,
    /// Suppress patterns with an equal-support single-token extension.
    #[default]
    Closed,
    /// Emit only patterns with no frequent extension.
    Maximal,
}

impl From<PatternMode> for PatternFilter {
    fn from(mode: PatternMode) -> Self {
        match mode {
            PatternMode::All => Self::All,
            PatternMode::Closed => Self::Closed,
            PatternMode::Maximal => Self::Maximal,
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                 Log filter (e.g., debug, phrasemine=trace)
    PHRASEMINE_LOG_LEVEL     Log level (debug, info, warn, error)
    PHRASEMINE_OUTPUT        Result CSV path
    PHRASEMINE_SPILL_PATH    On-disk corpus file path
";

/// Command-line interface definition for phrasemine.
#[derive(Parser, Debug)]
#[command(name = "phrasemine")]
#[command(about = "Mine frequent contiguous phrases from a document corpus", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// Input corpus: a directory of documents or a CSV file
    pub input: Utf8PathBuf,

    /// Minimum number of distinct documents a phrase must appear in
    #[arg(long = "n", value_name = "MIN_DOCS", default_value_t = 10)]
    pub min_docs: usize,

    /// Seed length for the greedy miner / minimum pattern length
    #[arg(long, value_name = "LEN", default_value_t = 4)]
    pub ngrams: usize,

    /// File mask for directory scans: empty or "*" for all, "*.ext", or an
    /// exact file name
    #[arg(long, value_name = "MASK", default_value = "")]
    pub mask: String,

    /// Fraction of input documents to retain, 0.0-1.0
    #[arg(long, value_name = "RATE", default_value_t = 1.0)]
    pub sampling: f64,

    /// Upper bound on tokenization worker threads; 0 uses all cores
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub threads: usize,

    /// Advisory memory cap in MiB; 0 for no limit
    #[arg(long = "mem", value_name = "MIB", default_value_t = 0)]
    pub memory_limit_mb: usize,

    /// Maximum entries in the on-disk document cache
    #[arg(long, value_name = "COUNT", default_value_t = 1000)]
    pub cache: usize,

    /// Keep the entire encoded corpus in RAM (skips the corpus.bin spill)
    #[arg(long = "in-mem")]
    pub in_memory: bool,

    /// Populate the document cache while loading
    #[arg(long)]
    pub preload: bool,

    /// CSV field delimiter; accepts \t and \n escapes
    #[arg(long = "csv-delim", value_name = "CHAR", default_value = ",")]
    pub csv_delimiter: String,

    /// Mining strategy
    #[arg(long, value_enum, default_value_t)]
    pub strategy: Strategy,

    /// PrefixSpan output filter
    #[arg(long = "pattern-mode", value_enum, default_value_t)]
    pub pattern_mode: PatternMode,

    /// Result CSV path (default: results_max.csv in the current directory)
    #[arg(long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Seed for the sampling shuffle, for reproducible runs
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output the run summary as JSON (for scripting)
    #[arg(long)]
    pub json: bool,
}
