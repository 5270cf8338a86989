//! rponto library root.
//! Exposes the CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Funcionario { .. } => cli::commands::funcionario::handle(&cli.command, cfg),
        Commands::Registrar { .. } => cli::commands::registrar::handle(&cli.command, cfg),
        Commands::Receber { .. } => cli::commands::receber::handle(&cli.command, cfg),
        Commands::Retificar { .. } => cli::commands::retificar::handle(&cli.command, cfg),
        Commands::Sincronizar { .. } => cli::commands::sincronizar::handle(&cli.command, cfg),
        Commands::Excluir { .. } => cli::commands::excluir::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1. parse CLI
    let cli = Cli::parse();

    // 2. load config ONCE per process; it is passed down explicitly, there
    //    is no global mutable state behind the handlers
    let mut cfg = Config::load();

    // 3. apply a DB override from the command line, if any
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4. hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
