//! rStatbook library root.
//! Exposes the CLI parser, the high-level run() function, and the stat
//! entry modules (grids, dirty tracking, unsaved-changes arbitration).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Team { action } => commands::team::handle(action, cfg),
        Commands::Roster { action } => commands::roster::handle(action, cfg),
        Commands::Game { action } => commands::game::handle(action, cfg),
        Commands::Stats { action } => commands::stats::handle(action, cfg),
        Commands::Session { .. } => commands::session::handle(&cli.command, cfg),
        Commands::Season { .. } => commands::season::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(account) = &cli.account {
        cfg.account = account.clone();
    }

    dispatch(&cli, &cfg)
}
