//! Live single-punch registration with conflict detection and ordinal
//! classification.

use crate::config::Config;
use crate::core::trava::{TravasDia, destravar};
use crate::db::pool::DbPool;
use crate::db::queries::{count_batidas_do_dia, find_batida_exata, insert_batida};
use crate::errors::{AppError, AppResult};
use crate::models::batida::Batida;
use crate::models::tipo_batida::TipoBatida;
use crate::utils::fuso;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike, Utc};

/// Input of one live registration. Everything optional so that presence
/// validation can name every missing field at once.
#[derive(Debug, Clone, Default)]
pub struct RegistrarEntrada {
    pub funcionario_id: Option<i64>,
    pub emp: Option<String>,
    pub dat: Option<NaiveDate>,
    pub hora: Option<NaiveTime>,
    pub locacao_id: Option<i64>,
    pub origem: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub endereco: Option<String>,
    pub distancia_m: Option<i64>,
    pub status: Option<String>,
    pub justificativa: Option<String>,
    pub ori: Option<String>,
}

/// High-level business logic for the `registrar` command.
pub struct RegistrarLogic;

impl RegistrarLogic {
    pub fn aplicar(
        pool: &mut DbPool,
        travas: &TravasDia,
        cfg: &Config,
        entrada: &RegistrarEntrada,
        agora: DateTime<Utc>,
    ) -> AppResult<Batida> {
        //
        // 1. Presence validation: report every missing field, not just the
        //    first one.
        //
        let mut faltando: Vec<&str> = Vec::new();
        if entrada.funcionario_id.is_none() {
            faltando.push("funcionario_id");
        }
        if entrada.emp.as_deref().map(str::trim).unwrap_or("").is_empty() {
            faltando.push("emp");
        }
        if entrada.dat.is_none() {
            faltando.push("dat");
        }
        if !faltando.is_empty() {
            return Err(AppError::validation(faltando));
        }

        let funcionario_id = entrada.funcionario_id.unwrap_or_default();
        let dat = entrada
            .dat
            .ok_or_else(|| AppError::validation(vec!["dat"]))?;

        let processo = fuso::para_horario_servidor(agora, cfg.fuso_horario_horas);
        // Clock times live to the minute; no client time means the server
        // wall clock stamps the punch.
        let hora = entrada.hora.unwrap_or_else(|| processo.time());
        let hora = NaiveTime::from_hms_opt(hora.hour(), hora.minute(), 0).unwrap_or(hora);

        //
        // 2. Serialize the employee-day: the count below and the insert must
        //    be observed as one atomic step or two concurrent registrations
        //    would share an ordinal role.
        //
        let trava = travas.trava(funcionario_id, dat);
        let _guarda = destravar(trava.lock());

        //
        // 3. Exact-duplicate probe.
        //
        if find_batida_exata(&pool.conn, funcionario_id, dat, hora)?.is_some() {
            return Err(AppError::Conflict(
                "a punch already exists at this time for this day".into(),
            ));
        }

        //
        // 4. Ordinal role from the count of live same-day punches.
        //
        let anteriores = count_batidas_do_dia(&pool.conn, funcionario_id, dat)?;
        let tip = TipoBatida::classificar(anteriores);

        //
        // 5. Insert with registration defaults.
        //
        let batida = Batida {
            id: 0,
            funcionario_id,
            emp: entrada.emp.clone().unwrap_or_default(),
            dat,
            hora,
            locacao_id: entrada.locacao_id,
            origem: entrada
                .origem
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "mobile".to_string()),
            lat: entrada.lat,
            lng: entrada.lng,
            endereco: entrada.endereco.clone(),
            distancia_m: entrada.distancia_m,
            status: entrada
                .status
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "registrado".to_string()),
            justificativa: entrada.justificativa.clone().unwrap_or_default(),
            processo,
            tip: Some(tip),
            ori: entrada
                .ori
                .clone()
                .unwrap_or_else(|| entrada.hora.map(crate::utils::time::format_time).unwrap_or_else(|| "00:00".into())),
            anexo: None,
            created_at: Local::now().to_rfc3339(),
            deleted_at: None,
        };

        insert_batida(&pool.conn, &batida)
    }
}
