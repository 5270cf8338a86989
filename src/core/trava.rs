//! Per-employee-day mutual exclusion.
//!
//! The classifier's correctness depends on "count existing punches, then
//! insert" being atomic per employee-day: two concurrent registrations for
//! the same employee on the same day would otherwise both observe the same
//! count and receive the same ordinal role. Callers hold the day's guard
//! across the count and the insert (and across the rectification recount).

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
pub struct TravasDia {
    mapa: Mutex<HashMap<(i64, NaiveDate), Arc<Mutex<()>>>>,
}

impl TravasDia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the lock for one (employee, day). The same key always
    /// resolves to the same mutex for the lifetime of the registry.
    pub fn trava(&self, funcionario_id: i64, dat: NaiveDate) -> Arc<Mutex<()>> {
        let mut mapa = destravar(self.mapa.lock());
        mapa.entry((funcionario_id, dat))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Recover from a poisoned lock instead of propagating the panic: the
/// guarded section only serializes DB calls and holds no invariant of its
/// own that a panicking thread could have broken.
pub fn destravar<'a, T>(r: Result<MutexGuard<'a, T>, std::sync::PoisonError<MutexGuard<'a, T>>>) -> MutexGuard<'a, T> {
    r.unwrap_or_else(|e| e.into_inner())
}
