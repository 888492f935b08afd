//! phrasemine CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use phrasemine::{Cli, run};
use phrasemine_core::{CancelFlag, ConfigLoader};
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    // A missing input argument is a usage error and exits 1, like a
    // nonexistent input path. Flag parse failures keep clap's exit 2;
    // --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if !err.use_stderr() {
                0
            } else if err.kind() == ErrorKind::MissingRequiredArgument {
                1
            } else {
                2
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    cli.color.apply();

    let mut loader = ConfigLoader::new();
    if let Some(ref config_path) = cli.config {
        loader = loader.with_file(config_path.clone());
    }
    let config = loader.load().context("failed to load configuration")?;

    let filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    observability::init(filter);
    debug!(
        input = %cli.input,
        strategy = ?cli.strategy,
        quiet = cli.quiet,
        verbose = cli.verbose,
        json = cli.json,
        "CLI initialized"
    );

    let cancel = CancelFlag::new();
    {
        let handler_flag = cancel.clone();
        ctrlc::set_handler(move || handler_flag.cancel())
            .context("failed to install interrupt handler")?;
    }

    let result = run::execute(&cli, &config, &cancel)
        .and_then(|summary| run::report(&summary, cli.json));
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
