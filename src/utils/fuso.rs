//! Fixed-offset timezone conversion between UTC instants and the server's
//! local wall clock. Every ingestion and projection boundary goes through
//! these two functions; nothing else in the codebase shifts hours.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Canonical server offset from UTC, in hours (America/Sao_Paulo, no DST).
pub const FUSO_PADRAO_HORAS: i64 = -3;

/// Shift a UTC instant into the server-local wall clock.
pub fn para_horario_servidor(instante: DateTime<Utc>, fuso_horas: i64) -> NaiveDateTime {
    instante.naive_utc() + Duration::hours(fuso_horas)
}

/// Shift a naive UTC timestamp into the server-local wall clock.
/// Used for payload timestamps that arrive without an explicit offset.
pub fn naive_para_horario_servidor(instante: NaiveDateTime, fuso_horas: i64) -> NaiveDateTime {
    instante + Duration::hours(fuso_horas)
}

/// Shift a server-local wall clock time back toward the client (the inverse
/// of ingestion). Projection boundaries use this before formatting.
pub fn do_horario_servidor(local: NaiveDateTime, fuso_horas: i64) -> NaiveDateTime {
    local - Duration::hours(fuso_horas)
}

/// Render a timestamp the way sync clients expect it.
pub fn formatar_para_cliente(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
