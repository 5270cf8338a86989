//! Deduplication fingerprint for punches.
//!
//! Two punches with the same fingerprint are the same real-world event, no
//! matter which system produced them or how many times the client resent
//! the batch over a flaky link.

use chrono::NaiveDateTime;

const NULO: &str = "null";

/// Compose the fingerprint from already-normalized parts: employee id,
/// server-local timestamp, and coordinates rounded to 6 decimal places.
/// Absent parts become the literal `"null"` token; this function never fails.
pub fn chave_batida(
    funcionario_id: Option<i64>,
    momento: Option<NaiveDateTime>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> String {
    let id = funcionario_id
        .map(|v| v.to_string())
        .unwrap_or_else(|| NULO.to_string());
    let quando = momento
        .map(|m| m.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| NULO.to_string());
    let lat = lat
        .map(|v| format!("{v:.6}"))
        .unwrap_or_else(|| NULO.to_string());
    let lng = lng
        .map(|v| format!("{v:.6}"))
        .unwrap_or_else(|| NULO.to_string());

    format!("{id}-{quando}-{lat}-{lng}")
}
