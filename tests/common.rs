#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rponto::config::Config;
use rponto::core::registrar::{RegistrarEntrada, RegistrarLogic};
use rponto::core::trava::TravasDia;
use rponto::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rpo() -> Command {
    cargo_bin_cmd!("rponto")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rponto.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary payload file path inside tempdir and ensure it's removed
pub fn temp_payload(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_payload.json", name));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Configuration used by engine-level tests: default windows, Brasília offset.
pub fn cfg_teste(db_path: &str) -> Config {
    Config {
        database: db_path.to_string(),
        fuso_horario_horas: -3,
        janela_sincronizacao_dias: 30,
        janela_reconciliacao_dias: 300,
    }
}

/// Open and initialize a throwaway database via the library API.
pub fn abrir_db(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    rponto::db::initialize::init_db(&pool.conn).expect("init db");
    pool
}

/// Fixed submission instant used across tests: 2024-05-01 15:00 UTC,
/// i.e. 12:00 server-local at the default -3 offset.
pub fn agora_fixo() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap()
}

pub fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, d).expect("valid date")
}

pub fn hora(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

/// Register one live punch through the engine; panics on failure.
pub fn registrar_batida(
    pool: &mut DbPool,
    cfg: &Config,
    travas: &TravasDia,
    funcionario_id: i64,
    dat: NaiveDate,
    hora: NaiveTime,
) -> rponto::models::batida::Batida {
    let entrada = RegistrarEntrada {
        funcionario_id: Some(funcionario_id),
        emp: Some("ACME".to_string()),
        dat: Some(dat),
        hora: Some(hora),
        ..RegistrarEntrada::default()
    };
    RegistrarLogic::aplicar(pool, travas, cfg, &entrada, agora_fixo()).expect("registrar")
}
