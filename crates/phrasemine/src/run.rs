//! Run orchestration: load the corpus, mine, write results, summarize.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use phrasemine_core::config::Config;
use phrasemine_core::corpus::{self, FileMask, LoadOptions};
use phrasemine_core::mine::{self, MinerParams};
use phrasemine_core::{CancelFlag, output};

use crate::{Cli, Strategy};

/// What a completed (or interrupted) run produced.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Documents loaded after masking and sampling.
    pub documents: usize,
    /// Distinct tokens in the dictionary.
    pub dictionary_size: usize,
    /// Total encoded token count.
    pub total_tokens: usize,
    /// Phrases written to the result CSV.
    pub phrases: usize,
    /// Whether mining was interrupted; partial results were still written.
    pub cancelled: bool,
    /// Path of the result CSV.
    pub output: Utf8PathBuf,
}

/// Execute one mining run end to end.
#[instrument(skip_all, fields(input = %cli.input, strategy = ?cli.strategy))]
pub fn execute(cli: &Cli, config: &Config, cancel: &CancelFlag) -> anyhow::Result<RunSummary> {
    if !(0.0..=1.0).contains(&cli.sampling) {
        bail!("--sampling must be between 0.0 and 1.0, got {}", cli.sampling);
    }
    if cli.ngrams == 0 {
        bail!("--ngrams must be at least 1");
    }

    let opts = LoadOptions {
        mask: FileMask::parse(&cli.mask),
        sampling: cli.sampling,
        threads: cli.threads,
        seed: cli.seed,
        in_memory: cli.in_memory,
        preload: cli.preload,
        cache_capacity: cli.cache,
        memory_limit_mb: cli.memory_limit_mb,
        csv_delimiter: parse_delimiter(&cli.csv_delimiter)?,
        spill_path: config
            .spill_path
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("corpus.bin"))
            .into_std_path_buf(),
    };

    let mut loaded = if is_csv_input(&cli.input) {
        debug!("loading as csv");
        corpus::load_csv(cli.input.as_std_path(), &opts)
            .with_context(|| format!("failed to load CSV {}", cli.input))?
    } else {
        debug!("loading as directory");
        corpus::load_directory(cli.input.as_std_path(), &opts)
            .with_context(|| format!("failed to load directory {}", cli.input))?
    };

    if !loaded.is_in_memory() {
        info!("on-disk mode: mining rehydrates the corpus first");
    }
    loaded
        .ensure_in_memory()
        .context("failed to rehydrate the on-disk corpus")?;

    let params = MinerParams {
        min_docs: cli.min_docs,
        min_len: cli.ngrams,
    };
    let phrases = match cli.strategy {
        Strategy::Greedy => mine::mine_greedy(&loaded, &params, cancel),
        Strategy::Prefixspan => {
            let mut mined =
                mine::mine_prefixspan(&loaded, &params, cli.pattern_mode.into(), cancel);
            output::sort_for_output(&mut mined);
            mined
        }
    };

    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| Utf8PathBuf::from("results_max.csv"));
    output::write_csv(output_path.as_std_path(), &phrases, &loaded)
        .with_context(|| format!("failed to write {output_path}"))?;

    Ok(RunSummary {
        documents: loaded.doc_count(),
        dictionary_size: loaded.dictionary.len(),
        total_tokens: loaded.total_tokens(),
        phrases: phrases.len(),
        cancelled: cancel.is_cancelled(),
        output: output_path,
    })
}

/// Print the run summary, as JSON when requested.
pub fn report(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "  {} {} documents, {} tokens, {} distinct",
        "Corpus:".cyan(),
        summary.documents,
        summary.total_tokens,
        summary.dictionary_size,
    );
    println!(
        "  {} {} phrases → {}",
        "Mined:".cyan(),
        summary.phrases,
        summary.output.bold(),
    );
    if summary.cancelled {
        println!(
            "  {} interrupted; partial results written",
            "Note:".yellow()
        );
    }
    Ok(())
}

/// A regular file is CSV input when its name contains `.csv` or lacks
/// `.txt`; anything else goes through the directory loader.
fn is_csv_input(input: &camino::Utf8Path) -> bool {
    input.is_file() && {
        let name = input.as_str();
        name.contains(".csv") || !name.contains(".txt")
    }
}

fn parse_delimiter(raw: &str) -> anyhow::Result<u8> {
    let delimiter = match raw {
        "\\t" => b'\t',
        "\\n" => b'\n',
        _ => match raw.as_bytes() {
            [b] => *b,
            _ => bail!("--csv-delim must be a single character, \\t, or \\n"),
        },
    };
    Ok(delimiter)
}
