//! Strictly Splendor - command-line driver
//!
//! Runs engine operations against a SQLite database. The `--user` flag
//! stands in for an authenticated identity.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use serde::Serialize;
use strictly_splendor::{EngineConfig, GameService, SqliteStore, Version};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = EngineConfig::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::new(config.database_url().clone())?;

    if let Command::Migrate = cli.command {
        store.run_migrations()?;
        info!(database_url = %config.database_url(), "Database ready");
        return Ok(());
    }

    let service = GameService::new(store, config.random_source());
    run(&service, cli.command)
}

/// Dispatches one game command.
#[instrument(skip(service))]
fn run(service: &GameService<SqliteStore>, command: Command) -> Result<()> {
    match command {
        Command::Migrate => Ok(()),
        Command::NewGame { players } => {
            let game = service.new_game(&players).context("Failed to create game")?;
            print_json(&serde_json::json!({ "game": game }))
        }
        Command::Show { game, user } => print_json(&service.get_game(&game, &user)?),
        Command::List { user } => print_json(&service.list_games(&user)?),
        Command::Delete { game, user } => {
            service.delete_game(&game, &user)?;
            print_json(&serde_json::json!({ "deleted": game }))
        }
        Command::TakeThree { game, user, colors } => {
            moved(service.take_three(&game, &user, colors.as_slice())?)
        }
        Command::TakeTwo { game, user, color } => moved(service.take_two(&game, &user, &color)?),
        Command::Reserve {
            game,
            user,
            tier,
            index,
        } => moved(service.reserve(&game, &user, tier, index)?),
        Command::Buy {
            game,
            user,
            tier,
            index,
        } => moved(service.buy(&game, &user, tier, index)?),
    }
}

fn moved(version: Version) -> Result<()> {
    print_json(&serde_json::json!({ "version": version }))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
