use super::tipo_batida::TipoBatida;
use crate::core::chave;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// One clock event (row of `ponto_batidas`).
#[derive(Debug, Clone, Serialize)]
pub struct Batida {
    pub id: i64,
    pub funcionario_id: i64,
    pub emp: String,                 // ⇔ company/tenant code
    pub dat: NaiveDate,              // ⇔ ponto_batidas.dat (TEXT "YYYY-MM-DD")
    pub hora: NaiveTime,             // ⇔ ponto_batidas.hora (TEXT "HH:MM")
    pub locacao_id: Option<i64>,
    pub origem: String,              // default 'mobile'
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub endereco: Option<String>,
    pub distancia_m: Option<i64>,
    pub status: String,              // 'novo' (batch) | 'registrado' (live)
    pub justificativa: String,
    pub processo: NaiveDateTime,     // server receipt, server-local clock
    pub tip: Option<TipoBatida>,     // NULL until a role is assigned
    pub ori: String,                 // client-side original time tag
    pub anexo: Option<String>,
    pub created_at: String,          // ISO8601
    pub deleted_at: Option<String>,
}

impl Batida {
    pub fn dat_str(&self) -> String {
        self.dat.format("%Y-%m-%d").to_string()
    }

    pub fn hora_str(&self) -> String {
        self.hora.format("%H:%M").to_string()
    }

    /// Server-local moment of the punch (date + wall clock time).
    pub fn momento(&self) -> NaiveDateTime {
        self.dat.and_time(self.hora)
    }

    /// Deduplication fingerprint of this ledger row. Stored rows are already
    /// normalized, so the fingerprint is derived from them as-is.
    pub fn chave(&self) -> String {
        chave::chave_batida(
            Some(self.funcionario_id),
            Some(self.momento()),
            self.lat,
            self.lng,
        )
    }
}
