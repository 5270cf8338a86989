use crate::cli::parser::Commands;
use crate::core::normalizar::BatidaRecebida;
use crate::core::receber::ReceberLogic;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use chrono::Utc;
use std::fs;

/// Reconcile a JSON batch file against the ledger.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Receber { file } = cmd {
        let conteudo = fs::read_to_string(file)?;
        let lote: Vec<BatidaRecebida> = serde_json::from_str(&conteudo)
            .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

        info(format!("Reconciling {} punches from {}…", lote.len(), file));

        let mut pool = DbPool::new(&cfg.database)?;
        let resultado = ReceberLogic::aplicar(&mut pool, cfg, &lote, Utc::now())?;

        if let Err(e) = ttlog(
            &pool.conn,
            "receber",
            file,
            &format!(
                "batch reconciled: {} inserted, {} already on record",
                resultado.inseridos, resultado.ignorados
            ),
        ) {
            eprintln!("⚠️ Failed to write internal log: {}", e);
        }

        success(format!(
            "Batch reconciled: {} inserted, {} already on record.",
            resultado.inseridos, resultado.ignorados
        ));
    }

    Ok(())
}
