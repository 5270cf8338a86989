//! Batch reconciliation: merge a client-submitted batch of punches into the
//! ledger without creating duplicates.

use crate::config::Config;
use crate::core::normalizar::{BatidaRecebida, normalizar};
use crate::db::pool::DbPool;
use crate::db::queries::{insert_batidas_lote, load_batidas_janela};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of one reconciliation call.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reconciliacao {
    pub inseridos: usize,
    pub ignorados: usize,
}

/// High-level business logic for the `receber` command.
pub struct ReceberLogic;

impl ReceberLogic {
    /// Merge `lote` against the ledger. Idempotent: resubmitting the same
    /// batch inserts zero rows the second time.
    pub fn aplicar(
        pool: &mut DbPool,
        cfg: &Config,
        lote: &[BatidaRecebida],
        agora: DateTime<Utc>,
    ) -> AppResult<Reconciliacao> {
        if lote.is_empty() {
            return Err(AppError::validation(vec!["pontos"]));
        }

        //
        // 1. Load the comparison window of the ledger (bounded; a full-table
        //    scan does not survive years of punches).
        //
        let hoje = crate::utils::fuso::para_horario_servidor(agora, cfg.fuso_horario_horas).date();
        let ledger = load_batidas_janela(&pool.conn, hoje, cfg.janela_reconciliacao_dias)?;

        //
        // 2. Fingerprint everything already on record.
        //
        let mut conhecidas: HashSet<String> = ledger.iter().map(|b| b.chave()).collect();

        //
        // 3. Normalize and filter. Accepted fingerprints join the set at
        //    once so an in-batch duplicate collapses to its first occurrence
        //    (submission order wins).
        //
        let mut aceitas = Vec::new();
        for recebida in lote {
            let batida = normalizar(recebida, agora, cfg.fuso_horario_horas)?;
            if conhecidas.insert(batida.chave()) {
                aceitas.push(batida);
            }
        }

        let ignorados = lote.len() - aceitas.len();

        if aceitas.is_empty() {
            // Everything was already on record: a successful no-op.
            return Ok(Reconciliacao {
                inseridos: 0,
                ignorados,
            });
        }

        //
        // 4. One batched insert; all-or-nothing.
        //
        let gravadas = insert_batidas_lote(&mut pool.conn, &aceitas)?;

        if gravadas == 0 {
            return Err(AppError::Internal(
                "no rows written for a non-empty accepted batch".into(),
            ));
        }

        Ok(Reconciliacao {
            inseridos: gravadas,
            ignorados,
        })
    }
}
