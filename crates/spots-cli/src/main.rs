//! Spots CLI - Mark where you are and find your way back
//!
//! Saves positions from the terminal and opens them in a map app later.

mod cli;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::delete::{run_clear, run_delete};
use crate::commands::edit::{run_note, run_rename};
use crate::commands::export::run_export;
use crate::commands::list::{run_last, run_list, run_show};
use crate::commands::mark::run_mark;
use crate::commands::open::{run_open, run_share};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spots=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Completions { shell, output }) = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let context = CliContext::load(cli.db_path, cli.config, cli.no_geocode)?;

    match cli.command {
        Some(Commands::Mark(args)) => run_mark(args, &context).await?,
        Some(Commands::Last { json }) => run_last(json, &context).await?,
        Some(Commands::List { limit, json }) => run_list(limit, json, &context).await?,
        Some(Commands::Show { id, json }) => run_show(&id, json, &context).await?,
        Some(Commands::Rename { id, title }) => run_rename(&id, &title, &context).await?,
        Some(Commands::Note { id, text }) => run_note(&id, &text, &context).await?,
        Some(Commands::Delete { id }) => run_delete(&id, &context).await?,
        Some(Commands::Clear { yes }) => run_clear(yes, &context).await?,
        Some(Commands::Open { id, app }) => {
            run_open(id.as_deref(), app.map(Into::into), &context).await?;
        }
        Some(Commands::Share { id }) => run_share(id.as_deref(), &context).await?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &context).await?;
        }
        Some(Commands::Completions { .. }) => {}
        None => run_list(10, false, &context).await?,
    }

    Ok(())
}
