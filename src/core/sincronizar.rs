//! Sync projection: a rolling window of one employee's punches, rendered
//! with every timestamp shifted back toward the client.

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::load_batidas_funcionario;
use crate::errors::AppResult;
use crate::models::batida::Batida;
use crate::utils::fuso;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

/// One punch as a sync client sees it: timestamps pre-shifted and formatted,
/// nothing left to interpret on the device.
#[derive(Debug, Clone, Serialize)]
pub struct BatidaVista {
    pub id: i64,
    pub funcionario_id: i64,
    pub emp: String,
    pub dat: String,
    pub hora: Option<String>,
    pub locacao_id: Option<i64>,
    pub origem: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub endereco: Option<String>,
    pub distancia_m: Option<i64>,
    pub status: String,
    pub justificativa: String,
    pub processo: String,
    pub tip: Option<String>,
    pub ori: String,
    pub anexo: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

/// High-level business logic for the `sincronizar` command.
pub struct SincronizarLogic;

impl SincronizarLogic {
    /// Read-only. An empty window is a successful empty vector.
    pub fn aplicar(
        pool: &mut DbPool,
        cfg: &Config,
        funcionario_id: i64,
        dias: Option<i64>,
        agora: DateTime<Utc>,
    ) -> AppResult<Vec<BatidaVista>> {
        let dias = dias.unwrap_or(cfg.janela_sincronizacao_dias);
        let hoje = fuso::para_horario_servidor(agora, cfg.fuso_horario_horas).date();
        let de = hoje - Duration::days(dias);

        let batidas = load_batidas_funcionario(&pool.conn, funcionario_id, de, hoje)?;

        Ok(batidas
            .into_iter()
            .map(|b| projetar(b, cfg.fuso_horario_horas))
            .collect())
    }
}

fn projetar(b: Batida, fuso_horas: i64) -> BatidaVista {
    // dat is projected at midnight, like every other timestamp-bearing field
    let dat = fuso::formatar_para_cliente(fuso::do_horario_servidor(
        b.dat.and_time(NaiveTime::MIN),
        fuso_horas,
    ));
    let processo = fuso::formatar_para_cliente(fuso::do_horario_servidor(b.processo, fuso_horas));

    // created_at is stored as RFC 3339; shift it when it parses, pass it
    // through untouched when a legacy row carries something else.
    let created_at = match DateTime::parse_from_rfc3339(&b.created_at) {
        Ok(dt) => fuso::formatar_para_cliente(dt.naive_utc()),
        Err(_) => b.created_at.clone(),
    };

    BatidaVista {
        id: b.id,
        funcionario_id: b.funcionario_id,
        emp: b.emp,
        dat,
        hora: Some(b.hora.format("%H:%M").to_string()),
        locacao_id: b.locacao_id,
        origem: b.origem,
        lat: b.lat,
        lng: b.lng,
        endereco: b.endereco,
        distancia_m: b.distancia_m,
        status: b.status,
        justificativa: b.justificativa,
        processo,
        tip: b.tip.map(|t| t.to_db_str().to_string()),
        ori: b.ori,
        anexo: b.anexo,
        created_at,
        deleted_at: b.deleted_at,
    }
}
