use crate::cli::parser::Commands;
use crate::core::excluir::ExcluirLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::Utc;

/// Soft-delete a punch.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Excluir { id, funcionario } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        ExcluirLogic::aplicar(&mut pool, cfg, *id, *funcionario, Utc::now())?;

        success(format!("Punch {} soft-deleted.", id.unwrap_or_default()));
    }

    Ok(())
}
