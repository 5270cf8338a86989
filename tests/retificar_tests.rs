mod common;
use common::{abrir_db, agora_fixo, cfg_teste, dia, hora, registrar_batida, setup_test_db};

use rponto::core::retificar::{Requisicao, Retificacao, Retificado, RetificarLogic};
use rponto::core::trava::TravasDia;
use rponto::db::queries::{find_batida_por_id, find_evento_por_id, insert_funcionario};
use rponto::errors::AppError;
use rponto::models::evento::Aprovacao;
use rponto::models::tipo_batida::TipoBatida;
use rponto::models::tipo_evento::TipoEvento;

fn contar_eventos(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM ponto_eventos", [], |row| row.get(0))
        .expect("count events")
}

#[test]
fn test_ajuste_mutates_the_linked_punch_and_creates_no_event() {
    let db_path = setup_test_db("retificar_ajuste");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Maria Souza").expect("employee");
    let d = dia(2024, 5, 1);
    let b1 = registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(8, 0));
    registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(17, 0));

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Horário corrigido".to_string(),
            descricao: "Esqueci de bater na entrada".to_string(),
            anexo: Some("uploads/atestado-0501.pdf".to_string()),
            sub_categoria: "ajuste".to_string(),
            batida_id: Some(b1.id),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let resultado =
        RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply");

    match resultado {
        Retificado::BatidaAtualizada(b) => {
            assert_eq!(b.id, b1.id);
            assert_eq!(b.justificativa, "AJUSTE: Horário corrigido");
            assert_eq!(b.anexo.as_deref(), Some("uploads/atestado-0501.pdf"));
            // first of two same-day punches in clock order → first-in
            assert_eq!(b.tip, Some(TipoBatida::Ent1));
        }
        outro => panic!("expected a mutated punch, got {outro:?}"),
    }

    assert_eq!(contar_eventos(&pool.conn), 0);
}

// Rectifying the later punch of the day recomputes its role from its
// position in clock-time order, not from insertion order.
#[test]
fn test_rectification_recomputes_role_from_clock_order() {
    let db_path = setup_test_db("retificar_posicao");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "João Lima").expect("employee");
    let d = dia(2024, 5, 1);
    // registered out of clock order on purpose
    let tarde = registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(17, 0));
    registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(8, 0));

    // insertion order said ent1; clock order says the 17:00 punch is second
    assert_eq!(tarde.tip, Some(TipoBatida::Ent1));

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Ajuste".to_string(),
            sub_categoria: "sistema".to_string(),
            batida_id: Some(tarde.id),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let resultado =
        RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply");
    match resultado {
        Retificado::BatidaAtualizada(b) => assert_eq!(b.tip, Some(TipoBatida::Sai1)),
        outro => panic!("expected a mutated punch, got {outro:?}"),
    }
}

// Without an explicit link the engine rectifies the latest punch of the
// stated date.
#[test]
fn test_rectification_falls_back_to_latest_punch_of_the_day() {
    let db_path = setup_test_db("retificar_fallback");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Ana Alves").expect("employee");
    let d = dia(2024, 5, 1);
    registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(8, 0));
    let ultima = registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(17, 0));

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Saída não registrada".to_string(),
            sub_categoria: "app".to_string(),
            ..Requisicao::default()
        },
        data: Some(d),
        ..Retificacao::default()
    };

    let resultado =
        RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply");
    match resultado {
        Retificado::BatidaAtualizada(b) => {
            assert_eq!(b.id, ultima.id);
            assert_eq!(b.justificativa, "APP: Saída não registrada");
        }
        outro => panic!("expected a mutated punch, got {outro:?}"),
    }
}

#[test]
fn test_atestado_creates_a_pending_event_and_touches_no_punch() {
    let db_path = setup_test_db("retificar_atestado");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Pedro Dias").expect("employee");
    let d = dia(2024, 5, 1);
    let batida = registrar_batida(&mut pool, &cfg, &travas, func.id, d, hora(8, 0));

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Medical".to_string(),
            descricao: "Consulta médica".to_string(),
            sub_categoria: "atestado".to_string(),
            // a linked punch on a justification-class request is ignored
            batida_id: Some(batida.id),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let resultado =
        RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply");

    match resultado {
        Retificado::EventoCriado(ev) => {
            assert_eq!(ev.tipo, TipoEvento::Atestado);
            assert_eq!(ev.aprovacao, Aprovacao::Pendente);
            assert_eq!(ev.emp, "ACME");
            assert_eq!(ev.motivo, "Medical");
            assert!(ev.id > 0);

            // and it round-trips from the store
            let persistido = find_evento_por_id(&pool.conn, ev.id)
                .expect("load")
                .expect("event persisted");
            assert_eq!(persistido.tipo, TipoEvento::Atestado);
            assert_eq!(persistido.observacao, "Consulta médica");
        }
        outro => panic!("expected a created event, got {outro:?}"),
    }

    let intacta = find_batida_por_id(&pool.conn, batida.id)
        .expect("load")
        .expect("punch still there");
    assert_eq!(intacta.justificativa, "");
    assert_eq!(intacta.tip, batida.tip);
    assert_eq!(contar_eventos(&pool.conn), 1);
}

#[test]
fn test_unknown_subcategory_defaults_to_justificativa_event() {
    let db_path = setup_test_db("retificar_padrao");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Rita Prado").expect("employee");

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Outra coisa".to_string(),
            sub_categoria: "inexistente".to_string(),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    match RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply") {
        Retificado::EventoCriado(ev) => {
            assert_eq!(ev.tipo, TipoEvento::Justificativa);
            // window start defaults to the submission instant, server-local
            assert_eq!(
                ev.data_inicio.format("%Y-%m-%d %H:%M").to_string(),
                "2024-05-01 12:00"
            );
            assert_eq!(ev.data_fim, None);
        }
        outro => panic!("expected a created event, got {outro:?}"),
    }
}

#[test]
fn test_unknown_employee_is_not_found() {
    let db_path = setup_test_db("retificar_sem_funcionario");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: 999,
            sub_categoria: "atestado".to_string(),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let erro = RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).unwrap_err();
    assert!(matches!(erro, AppError::NotFound(_)));
}

#[test]
fn test_window_end_before_start_is_rejected() {
    let db_path = setup_test_db("retificar_janela");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Luiz Rocha").expect("employee");

    let inicio = dia(2024, 5, 2).and_hms_opt(9, 0, 0).unwrap();
    let termino = dia(2024, 5, 1).and_hms_opt(9, 0, 0).unwrap();

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: func.id,
            titulo: "Férias".to_string(),
            sub_categoria: "afst".to_string(),
            inicio: Some(inicio),
            termino: Some(termino),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let erro = RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).unwrap_err();
    assert!(matches!(erro, AppError::Validation { .. }));
    assert_eq!(contar_eventos(&pool.conn), 0);
}

#[test]
fn test_rectifying_anothers_punch_is_not_found() {
    let db_path = setup_test_db("retificar_alheio");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let dona = insert_funcionario(&pool.conn, "ACME", "Dona").expect("employee");
    let outro = insert_funcionario(&pool.conn, "ACME", "Outro").expect("employee");
    let batida = registrar_batida(&mut pool, &cfg, &travas, dona.id, dia(2024, 5, 1), hora(8, 0));

    let req = Retificacao {
        requisicao: Requisicao {
            funcionario_id: outro.id,
            titulo: "Ajuste".to_string(),
            sub_categoria: "ajuste".to_string(),
            batida_id: Some(batida.id),
            ..Requisicao::default()
        },
        ..Retificacao::default()
    };

    let erro = RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).unwrap_err();
    assert!(matches!(erro, AppError::NotFound(_)));
}

// A second rectification appends to the justification instead of erasing
// the first annotation.
#[test]
fn test_second_rectification_appends_to_justification() {
    let db_path = setup_test_db("retificar_acumula");
    let mut pool = abrir_db(&db_path);
    let cfg = cfg_teste(&db_path);
    let travas = TravasDia::new();

    let func = insert_funcionario(&pool.conn, "ACME", "Iara Melo").expect("employee");
    let batida = registrar_batida(&mut pool, &cfg, &travas, func.id, dia(2024, 5, 1), hora(8, 0));

    for titulo in ["Primeira", "Segunda"] {
        let req = Retificacao {
            requisicao: Requisicao {
                funcionario_id: func.id,
                titulo: titulo.to_string(),
                sub_categoria: "ajuste".to_string(),
                batida_id: Some(batida.id),
                ..Requisicao::default()
            },
            ..Retificacao::default()
        };
        RetificarLogic::aplicar(&mut pool, &travas, &cfg, &req, agora_fixo()).expect("apply");
    }

    let final_ = find_batida_por_id(&pool.conn, batida.id)
        .expect("load")
        .expect("punch");
    assert_eq!(final_.justificativa, "AJUSTE: Primeira; AJUSTE: Segunda");
}
