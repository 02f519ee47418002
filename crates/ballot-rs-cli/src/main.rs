//! Command-line access to per-option comment storage.

use anyhow::Context;
use ballot_rs_cli::{Cli, resolve_config, run};
use clap::Parser;
use log::info;

/// Entry point for the `ballot-comments` command.
fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting ballot-comments (config_set={}, root_set={})",
        cli.config.is_some(),
        cli.root.is_some()
    );
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let config = resolve_config(&cli, &cwd)?;
    let stdout = std::io::stdout();
    run(cli, &config, &mut stdout.lock())
}
