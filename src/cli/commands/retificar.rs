use crate::cli::parser::Commands;
use crate::core::retificar::{Retificacao, Retificado, RetificarLogic};
use crate::core::trava::TravasDia;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::Utc;
use std::fs;

/// Submit a correction request from a JSON file.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Retificar { file } = cmd {
        let conteudo = fs::read_to_string(file)?;
        let req: Retificacao = serde_json::from_str(&conteudo)
            .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

        let mut pool = DbPool::new(&cfg.database)?;
        let travas = TravasDia::new();

        match RetificarLogic::aplicar(&mut pool, &travas, cfg, &req, Utc::now())? {
            Retificado::EventoCriado(ev) => {
                success(format!(
                    "Correction event {} created ({}, {}).",
                    ev.id,
                    ev.tipo.to_db_str(),
                    ev.aprovacao.to_db_str()
                ));
            }
            Retificado::BatidaAtualizada(b) => {
                success(format!(
                    "Punch {} rectified: role {}, justification \"{}\".",
                    b.id,
                    b.tip.map(|t| t.to_db_str()).unwrap_or("-"),
                    b.justificativa
                ));
            }
        }
    }

    Ok(())
}
