//! Context setup, dispatch and the per-command handlers.
//!
//! Handlers call the API, print what comes back and report whether the command
//! succeeded. A command whose result carries an error message exits with status 1.

use super::browse;
use super::render::{print_messages, render_saved, render_search, render_settings};
use super::setup::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;
use stockpix::commands::config::ConfigAction;
use stockpix::error::Result;
use stockpix::init::{initialize, StockContext};
use stockpix::model::PhotoSource;
use stockpix::save::{vault_relative, Insertion};
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let succeeded = runtime.block_on(dispatch(cli))?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,stockpix=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<bool> {
    let cwd = std::env::current_dir()?;
    let ctx = initialize(&cwd, cli.vault.as_deref())?;

    match cli.command {
        Commands::Search { query, provider } => {
            handle_search(&ctx, query.join(" "), provider).await
        }
        Commands::Browse { query } => browse::run(&ctx, query.join(" ")).await,
        Commands::Save {
            target,
            query,
            note,
            line,
        } => {
            // An absolute note path inside the vault is stored and reported vault-relative.
            let note = note.map(|n| vault_relative(&ctx.api.paths().root, &n));
            handle_save(&ctx, target, query, &insertion(note, line)).await
        }
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Init => handle_init(&ctx),
    }
}

async fn handle_search(
    ctx: &StockContext,
    query: String,
    provider: Option<PhotoSource>,
) -> Result<bool> {
    let result = ctx.api.search(&query, provider).await?;
    if let Some(search) = &result.search {
        if !search.is_empty() {
            print!("{}", render_search(search, ctx.api.preferred_provider()));
        }
    }
    print_messages(&result.messages);
    Ok(!result.has_errors())
}

async fn handle_save(
    ctx: &StockContext,
    target: String,
    query: String,
    insertion: &Insertion,
) -> Result<bool> {
    let result = ctx.api.save(&target, &query, insertion).await?;
    print_messages(&result.messages);
    if let Some(saved) = &result.saved {
        print!("{}", render_saved(saved));
    }
    Ok(!result.has_errors())
}

/// `--line` is 1-based on the command line.
fn insertion(note: Option<PathBuf>, line: Option<usize>) -> Insertion {
    match (note, line) {
        (Some(note), Some(line)) => Insertion::Line {
            note,
            line: line.saturating_sub(1),
        },
        (Some(note), None) => Insertion::Append { note },
        (None, _) => Insertion::None,
    }
}

fn handle_config(ctx: &StockContext, key: Option<String>, value: Option<String>) -> Result<bool> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(settings) = &result.settings {
            print!("{}", render_settings(settings));
        }
    }
    print_messages(&result.messages);
    Ok(!result.has_errors())
}

fn handle_init(ctx: &StockContext) -> Result<bool> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(!result.has_errors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_flag_is_one_based() {
        assert_eq!(
            insertion(Some("a.md".into()), Some(3)),
            Insertion::Line {
                note: "a.md".into(),
                line: 2
            }
        );
        assert_eq!(
            insertion(Some("a.md".into()), Some(0)),
            Insertion::Line {
                note: "a.md".into(),
                line: 0
            }
        );
        assert_eq!(
            insertion(Some("a.md".into()), None),
            Insertion::Append {
                note: "a.md".into()
            }
        );
        assert_eq!(insertion(None, None), Insertion::None);
    }
}
