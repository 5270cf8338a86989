use crate::cli::parser::Commands;
use crate::core::sincronizar::SincronizarLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use chrono::Utc;

/// Print an employee's sync window as JSON.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Sincronizar { funcionario, dias } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        let vistas = SincronizarLogic::aplicar(&mut pool, cfg, *funcionario, *dias, Utc::now())?;

        if vistas.is_empty() {
            info("No punches in the window.");
        }

        let json = serde_json::to_string_pretty(&vistas)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        println!("{json}");
    }

    Ok(())
}
