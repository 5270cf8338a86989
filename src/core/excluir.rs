//! Punch soft deletion. Rows are stamped, never dropped: sync clients need
//! the tombstone and the ordinal recount needs the live/deleted distinction.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::soft_delete_batida;
use crate::errors::{AppError, AppResult};
use crate::utils::fuso;
use chrono::{DateTime, Utc};

/// High-level business logic for the `excluir` command.
pub struct ExcluirLogic;

impl ExcluirLogic {
    pub fn aplicar(
        pool: &mut DbPool,
        cfg: &Config,
        id: Option<i64>,
        funcionario_id: Option<i64>,
        agora: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut faltando: Vec<&str> = Vec::new();
        if id.is_none() {
            faltando.push("id");
        }
        if funcionario_id.is_none() {
            faltando.push("funcionario_id");
        }
        if !faltando.is_empty() {
            return Err(AppError::validation(faltando));
        }

        let id = id.unwrap_or_default();
        let funcionario_id = funcionario_id.unwrap_or_default();
        let quando = fuso::para_horario_servidor(agora, cfg.fuso_horario_horas);

        let tocadas = soft_delete_batida(&pool.conn, id, funcionario_id, quando)?;
        if tocadas == 0 {
            return Err(AppError::NotFound("punch not found".into()));
        }

        if let Err(e) = ttlog(
            &pool.conn,
            "excluir",
            &id.to_string(),
            &format!("soft-deleted punch {id} of employee {funcionario_id}"),
        ) {
            eprintln!("⚠️ Failed to write internal log: {e}");
        }

        Ok(())
    }
}
