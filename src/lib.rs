//! sheet-invoicer library root.
//! Exposes the CLI parser, the high-level run() function, and the modules
//! behind it: configuration, spreadsheet access, rendering and the run logic.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod models;
pub mod render;
pub mod sheets;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(command: &Commands, cfg: &Config) -> AppResult<()> {
    match command {
        Commands::Run { .. } => cli::commands::run::handle(command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // 2️⃣ load config once, before anything touches the spreadsheet
    let cfg = Config::load(&cli.config)?;

    // 3️⃣ no subcommand → run
    let command = cli.command.clone().unwrap_or_else(Commands::default_run);
    dispatch(&command, &cfg)
}
