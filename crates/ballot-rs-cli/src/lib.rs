//! Library entry point for the `ballot-comments` command.
//!
//! Parses nothing itself: [`run`] takes an already-parsed [`Cli`] and writes
//! its output to the provided sink so it can be driven from tests.

use anyhow::Context;
use ballot_rs_comments::{
    CommentKind, CommentStore, CommentView, FileCommentStore, RawAuthorNames, views,
};
use ballot_rs_config::BallotConfig;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line options for the comment tool.
#[derive(Debug, Parser)]
#[command(name = "ballot-comments", version)]
pub struct Cli {
    /// Optional path to a ballot.json5 config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Storage root override (takes precedence over config)
    #[arg(long)]
    pub root: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every comment on an option
    List {
        /// Option identifier
        option_id: String,
    },
    /// Store a new comment on an option
    Add {
        /// Option identifier
        option_id: String,
        /// Author user id
        #[arg(long)]
        author: String,
        /// Comment text
        #[arg(long)]
        body: String,
        /// comment, pro, or con
        #[arg(long, default_value = "comment")]
        kind: CommentKind,
    },
}

/// Resolve the effective config for a CLI invocation.
pub fn resolve_config(cli: &Cli, cwd: &Path) -> anyhow::Result<BallotConfig> {
    let mut config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        BallotConfig::load_from_path(path).context("failed to load config")?
    } else {
        info!("loading layered config from cwd: {}", cwd.display());
        let layered =
            BallotConfig::load_layered(cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    if let Some(root) = cli.root.as_ref() {
        config.storage.root = Some(root.to_string_lossy().to_string());
    }
    Ok(config)
}

/// Execute a parsed command against the configured store.
pub fn run(cli: Cli, config: &BallotConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let store = FileCommentStore::from_config(&config.storage)
        .context("failed to open comment store")?;
    match cli.command {
        Command::List { option_id } => {
            let records = store
                .load(&option_id)
                .with_context(|| format!("failed to load comments for {option_id}"))?;
            for view in views(&records, &RawAuthorNames) {
                writeln!(out, "{}", format_view(&view))?;
            }
        }
        Command::Add {
            option_id,
            author,
            body,
            kind,
        } => {
            let record = store
                .append_with_kind(&author, &option_id, &body, kind)
                .with_context(|| format!("failed to add comment to {option_id}"))?;
            writeln!(
                out,
                "stored {} on {} at {}",
                record.kind,
                record.option_id,
                record.nice_date()
            )?;
        }
    }
    Ok(())
}

/// One display line per comment.
fn format_view(view: &CommentView) -> String {
    format!(
        "[{}] {} ({}): {}",
        view.date, view.author_name, view.kind, view.body
    )
}
