//! Tracing bootstrap for the CLI.
//!
//! Logs go to stderr so stdout stays clean for `--json` output. An explicit
//! `RUST_LOG` always wins; otherwise the filter is derived from the
//! quiet/verbose flags and the configured log level.

use tracing_subscriber::EnvFilter;

/// Build the log filter from CLI flags and the configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "debug",
            _ => "trace",
        }
    };
    let directives = format!("phrasemine={level},phrasemine_core={level}");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Install the global subscriber.
pub fn init(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
