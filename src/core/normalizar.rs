//! Payload normalization: map the field-name variants produced by the
//! mobile clients onto canonical attributes, coerce stringly-typed numbers,
//! and pin every timestamp to the server's wall clock.
//!
//! All aliasing lives here, declaratively, instead of `a || b` fallbacks
//! scattered through the business logic.

use crate::errors::{AppError, AppResult};
use crate::models::batida::Batida;
use crate::utils::fuso;
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Deserialize;

/// A payload value that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValorFlexivel {
    Numero(f64),
    Texto(String),
}

impl ValorFlexivel {
    pub fn como_f64(&self) -> Option<f64> {
        match self {
            ValorFlexivel::Numero(n) => Some(*n),
            ValorFlexivel::Texto(s) => s.trim().parse().ok(),
        }
    }

    pub fn como_i64(&self) -> Option<i64> {
        match self {
            ValorFlexivel::Numero(n) => Some(*n as i64),
            ValorFlexivel::Texto(s) => s.trim().parse().ok(),
        }
    }
}

/// One raw punch as submitted by a client. Every known field-name variant
/// is accepted; the canonical names are the Portuguese ones the ledger uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatidaRecebida {
    #[serde(default, alias = "userId", alias = "employeeId")]
    pub funcionario_id: Option<ValorFlexivel>,

    #[serde(default, alias = "empresa", alias = "companyCode")]
    pub emp: Option<String>,

    #[serde(default, alias = "data", alias = "date")]
    pub dat: Option<String>,

    #[serde(default, alias = "clockTime")]
    pub hora: Option<String>,

    #[serde(default, alias = "cliente_id", alias = "locationId")]
    pub locacao_id: Option<ValorFlexivel>,

    #[serde(default, alias = "origin")]
    pub origem: Option<String>,

    #[serde(default, alias = "latitude")]
    pub lat: Option<ValorFlexivel>,

    #[serde(default, alias = "longitude")]
    pub lng: Option<ValorFlexivel>,

    #[serde(default, alias = "address")]
    pub endereco: Option<String>,

    #[serde(default, alias = "distancia", alias = "distanceMeters")]
    pub distancia_m: Option<ValorFlexivel>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, alias = "justification")]
    pub justificativa: Option<String>,

    #[serde(default, alias = "originalOrientation")]
    pub ori: Option<String>,
}

/// Timestamp policy for incoming `dat` values:
/// - a value with a time component is a UTC instant → shifted into the
///   server's wall clock by the fixed offset;
/// - a bare date is already a server-local calendar date → combined with
///   `hora` untouched.
fn momento_local(dat: &str, hora: Option<NaiveTime>, fuso_horas: i64) -> Option<NaiveDateTime> {
    let dat = dat.trim().trim_end_matches('Z');

    for formato in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(dat, formato) {
            return Some(fuso::naive_para_horario_servidor(dt, fuso_horas));
        }
    }

    let d = chrono::NaiveDate::parse_from_str(dat, "%Y-%m-%d").ok()?;
    Some(d.and_time(hora.unwrap_or(NaiveTime::MIN)))
}

/// The ledger stores clock times to the minute; fingerprints must agree
/// with what a stored row round-trips to, or resubmissions with seconds
/// would slip past deduplication.
fn ao_minuto(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// Produce the canonical ledger record for one raw punch.
///
/// Required: employee id, company code, date — every absent one is collected
/// into a single Validation error. No ordinal role is assigned here: raw
/// imports carry `tip = NULL` until a later pass classifies them.
pub fn normalizar(
    recebida: &BatidaRecebida,
    agora: DateTime<Utc>,
    fuso_horas: i64,
) -> AppResult<Batida> {
    let mut faltando: Vec<&str> = Vec::new();

    let funcionario_id = recebida.funcionario_id.as_ref().and_then(|v| v.como_i64());
    if funcionario_id.is_none() {
        faltando.push("funcionario_id");
    }

    let emp = recebida.emp.as_deref().map(str::trim).unwrap_or("");
    if emp.is_empty() {
        faltando.push("emp");
    }

    if recebida.dat.as_deref().map(str::trim).unwrap_or("").is_empty() {
        faltando.push("dat");
    }

    if !faltando.is_empty() {
        return Err(AppError::validation(faltando));
    }

    let hora_str = recebida.hora.as_deref().unwrap_or("00:00");
    let hora = crate::utils::time::parse_time(hora_str)
        .ok_or_else(|| AppError::InvalidTime(hora_str.to_string()))?;

    let dat_bruta = recebida.dat.as_deref().unwrap_or_default();
    let momento = momento_local(dat_bruta, Some(hora), fuso_horas)
        .ok_or_else(|| AppError::InvalidDate(dat_bruta.to_string()))?;

    Ok(Batida {
        id: 0,
        funcionario_id: funcionario_id.unwrap_or_default(),
        emp: emp.to_string(),
        dat: momento.date(),
        hora: ao_minuto(if recebida.hora.is_some() {
            hora
        } else {
            momento.time()
        }),
        locacao_id: recebida.locacao_id.as_ref().and_then(|v| v.como_i64()),
        origem: recebida
            .origem
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "mobile".to_string()),
        lat: recebida.lat.as_ref().and_then(|v| v.como_f64()),
        lng: recebida.lng.as_ref().and_then(|v| v.como_f64()),
        endereco: recebida.endereco.clone(),
        distancia_m: recebida.distancia_m.as_ref().and_then(|v| v.como_i64()),
        status: recebida
            .status
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "novo".to_string()),
        justificativa: recebida.justificativa.clone().unwrap_or_default(),
        processo: fuso::para_horario_servidor(agora, fuso_horas),
        tip: None,
        ori: recebida.ori.clone().unwrap_or_else(|| "00:00".to_string()),
        anexo: None,
        created_at: Local::now().to_rfc3339(),
        deleted_at: None,
    })
}
