mod common;
use common::{abrir_db, agora_fixo, cfg_teste, dia, hora, registrar_batida, setup_test_db};

use rponto::core::registrar::{RegistrarEntrada, RegistrarLogic};
use rponto::core::trava::TravasDia;
use rponto::db::pool::DbPool;
use rponto::errors::AppError;
use rponto::models::tipo_batida::TipoBatida;
use std::sync::Arc;
use std::thread;

#[test]
fn test_four_punches_walk_the_daily_sequence() {
    let db_path = setup_test_db("registrar_sequencia");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();
    let d = dia(2024, 5, 1);

    let b1 = registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(8, 0));
    let b2 = registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(12, 0));
    let b3 = registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(13, 0));
    let b4 = registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(17, 0));

    assert_eq!(b1.tip, Some(TipoBatida::Ent1));
    assert_eq!(b2.tip, Some(TipoBatida::Sai1));
    assert_eq!(b3.tip, Some(TipoBatida::Ent2));
    assert_eq!(b4.tip, Some(TipoBatida::Sai2));

    // the fifth punch of the day is overflow
    let b5 = registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(18, 0));
    assert_eq!(b5.tip, Some(TipoBatida::Ext));
}

#[test]
fn test_duplicate_time_is_a_conflict_and_inserts_nothing() {
    let db_path = setup_test_db("registrar_conflito");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();
    let d = dia(2024, 5, 1);

    registrar_batida(&mut pool, &cfg, &travas, 42, d, hora(8, 0));

    let entrada = RegistrarEntrada {
        funcionario_id: Some(42),
        emp: Some("ACME".to_string()),
        dat: Some(d),
        hora: Some(hora(8, 0)),
        ..RegistrarEntrada::default()
    };
    let erro =
        RegistrarLogic::aplicar(&mut pool, &travas, &cfg, &entrada, agora_fixo()).unwrap_err();
    assert!(matches!(erro, AppError::Conflict(_)));

    let total = rponto::db::queries::count_batidas_do_dia(&pool.conn, 42, d).expect("count");
    assert_eq!(total, 1);
}

#[test]
fn test_missing_fields_are_all_reported() {
    let db_path = setup_test_db("registrar_validacao");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let erro = RegistrarLogic::aplicar(
        &mut pool,
        &travas,
        &cfg,
        &RegistrarEntrada::default(),
        agora_fixo(),
    )
    .unwrap_err();

    match erro {
        AppError::Validation { campos } => {
            assert_eq!(campos, vec!["funcionario_id", "emp", "dat"]);
        }
        outro => panic!("expected validation error, got {outro:?}"),
    }
}

#[test]
fn test_registration_defaults() {
    let db_path = setup_test_db("registrar_padroes");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let b = registrar_batida(&mut pool, &cfg, &travas, 42, dia(2024, 5, 1), hora(8, 0));
    assert_eq!(b.status, "registrado");
    assert_eq!(b.origem, "mobile");
    assert_eq!(b.justificativa, "");
    // receipt timestamp: 15:00 UTC shifted to 12:00 server-local
    assert_eq!(b.processo.format("%H:%M").to_string(), "12:00");
    assert!(b.id > 0);
}

// Punches of different employees on the same day classify independently.
#[test]
fn test_employees_do_not_share_the_daily_count() {
    let db_path = setup_test_db("registrar_isolado");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();
    let d = dia(2024, 5, 1);

    registrar_batida(&mut pool, &cfg, &travas, 1, d, hora(8, 0));
    let b = registrar_batida(&mut pool, &cfg, &travas, 2, d, hora(8, 30));
    assert_eq!(b.tip, Some(TipoBatida::Ent1));
}

// Four concurrent registrations for the same employee-day must come out
// with four distinct ordinal roles: the per-day lock serializes the
// count-then-insert step.
#[test]
fn test_concurrent_registrations_get_distinct_roles() {
    let db_path = setup_test_db("registrar_concorrente");
    {
        let pool = abrir_db(&db_path);
        drop(pool);
    }

    let travas = Arc::new(TravasDia::new());
    let d = dia(2024, 5, 1);
    let horas = [hora(8, 0), hora(12, 0), hora(13, 0), hora(17, 0)];

    let mut juntas = Vec::new();
    for h in horas {
        let travas = Arc::clone(&travas);
        let db_path = db_path.clone();
        juntas.push(thread::spawn(move || {
            let mut pool = DbPool::new(&db_path).expect("open db");
            let cfg = cfg_teste(&db_path);
            let entrada = RegistrarEntrada {
                funcionario_id: Some(42),
                emp: Some("ACME".to_string()),
                dat: Some(d),
                hora: Some(h),
                ..RegistrarEntrada::default()
            };
            RegistrarLogic::aplicar(&mut pool, &travas, &cfg, &entrada, agora_fixo())
                .expect("registrar")
                .tip
        }));
    }

    let mut tips: Vec<_> = juntas
        .into_iter()
        .map(|j| j.join().expect("thread").expect("tip assigned").to_db_str())
        .collect();
    tips.sort_unstable();
    assert_eq!(tips, vec!["ent1", "ent2", "sai1", "sai2"]);
}
