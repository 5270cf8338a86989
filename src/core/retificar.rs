//! Correction engine: classify a correction request into an event type and
//! either queue it for approval or rectify the linked punch in place.

use crate::config::Config;
use crate::core::trava::{TravasDia, destravar};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    find_batida_por_id, find_funcionario, insert_evento, load_batidas_do_dia,
    update_batida_retificada,
};
use crate::errors::{AppError, AppResult};
use crate::models::batida::Batida;
use crate::models::evento::{Aprovacao, PontoEvento};
use crate::models::tipo_batida::TipoBatida;
use crate::models::tipo_evento::TipoEvento;
use crate::utils::fuso;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// One correction request, as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Retificacao {
    #[serde(alias = "request")]
    pub requisicao: Requisicao,

    /// Date of the punch being corrected (legacy top-level field).
    #[serde(default, alias = "date")]
    pub data: Option<NaiveDate>,

    #[serde(default)]
    pub latitude: Option<String>,

    #[serde(default)]
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Requisicao {
    #[serde(alias = "user_id", alias = "employeeId")]
    pub funcionario_id: i64,

    #[serde(default, alias = "title")]
    pub titulo: String,

    #[serde(default, alias = "description")]
    pub descricao: String,

    #[serde(default, alias = "attachment")]
    pub anexo: Option<String>,

    #[serde(default, alias = "subCategoria", alias = "subcategory")]
    pub sub_categoria: String,

    #[serde(default, alias = "data_inicio", alias = "windowStart")]
    pub inicio: Option<NaiveDateTime>,

    #[serde(default, alias = "data_termino", alias = "windowEnd")]
    pub termino: Option<NaiveDateTime>,

    #[serde(default, alias = "ponto_id", alias = "linkedPunchId")]
    pub batida_id: Option<i64>,
}

/// The single primary artifact of one correction call.
#[derive(Debug, Clone)]
pub enum Retificado {
    /// Justification-class: a pending event awaits approval.
    EventoCriado(PontoEvento),
    /// Rectification-class: the punch itself was mutated.
    BatidaAtualizada(Batida),
}

/// High-level business logic for the `retificar` command.
pub struct RetificarLogic;

impl RetificarLogic {
    pub fn aplicar(
        pool: &mut DbPool,
        travas: &TravasDia,
        cfg: &Config,
        req: &Retificacao,
        agora: DateTime<Utc>,
    ) -> AppResult<Retificado> {
        //
        // 1. The company code on the event comes from the employee record,
        //    never from the request.
        //
        let funcionario = find_funcionario(&pool.conn, req.requisicao.funcionario_id)?
            .ok_or_else(|| AppError::NotFound("employee not found".into()))?;
        if funcionario.emp.trim().is_empty() {
            return Err(AppError::NotFound(
                "employee has no company code on record".into(),
            ));
        }

        //
        // 2. Event type from the free-text subcategory.
        //
        let tipo = TipoEvento::da_subcategoria(&req.requisicao.sub_categoria);

        //
        // 3-4. Attachment passes through opaquely; the event window defaults
        //      its start to the submission instant.
        //
        let agora_local = fuso::para_horario_servidor(agora, cfg.fuso_horario_horas);
        let inicio = req.requisicao.inicio.unwrap_or(agora_local);
        let termino = req.requisicao.termino;

        if let Some(t) = termino
            && t < inicio
        {
            return Err(AppError::validation(vec!["data_termino"]));
        }

        //
        // 5. Rectification-class mutates the punch; everything else queues a
        //    pending event. Exactly one primary artifact per call.
        //
        if tipo.is_retificacao() {
            return Self::retificar_batida(pool, travas, req, &funcionario.emp, tipo, inicio);
        }

        let evento = PontoEvento {
            id: 0,
            emp: funcionario.emp.clone(),
            funcionario_id: funcionario.id,
            tipo,
            data_inicio: inicio,
            data_fim: termino,
            motivo: req.requisicao.titulo.clone(),
            observacao: req.requisicao.descricao.clone(),
            anexo: req.requisicao.anexo.clone(),
            aprovacao: Aprovacao::Pendente,
            aprovador_id: None,
            aprovado_em: None,
            created_at: Local::now().to_rfc3339(),
        };

        // 6. No raw store error crosses this boundary.
        let inserido = insert_evento(&pool.conn, &evento).map_err(AppError::de_store)?;
        Ok(Retificado::EventoCriado(inserido))
    }

    /// Locate the target punch, annotate it and recompute its ordinal role
    /// from its clock-time position within the day.
    fn retificar_batida(
        pool: &mut DbPool,
        travas: &TravasDia,
        req: &Retificacao,
        emp: &str,
        tipo: TipoEvento,
        inicio: NaiveDateTime,
    ) -> AppResult<Retificado> {
        let funcionario_id = req.requisicao.funcionario_id;

        let alvo = match req.requisicao.batida_id {
            Some(id) => {
                let batida = find_batida_por_id(&pool.conn, id)?
                    .ok_or_else(|| AppError::NotFound("punch not found".into()))?;
                if batida.funcionario_id != funcionario_id {
                    return Err(AppError::NotFound(
                        "punch does not belong to this employee".into(),
                    ));
                }
                batida
            }
            None => {
                // No explicit link: the latest punch of the stated day.
                let dia = req.data.unwrap_or_else(|| inicio.date());
                let mut do_dia = load_batidas_do_dia(&pool.conn, funcionario_id, dia)?;
                do_dia
                    .pop()
                    .ok_or_else(|| AppError::NotFound("no punch on record for this date".into()))?
            }
        };

        // The recount below must not interleave with a registration for the
        // same employee-day.
        let trava = travas.trava(funcionario_id, alvo.dat);
        let _guarda = destravar(trava.lock());

        let mut justificativa = alvo.justificativa.clone();
        let anotacao = format!("{}: {}", tipo.to_db_str(), req.requisicao.titulo);
        if justificativa.trim().is_empty() {
            justificativa = anotacao;
        } else {
            justificativa = format!("{justificativa}; {anotacao}");
        }

        // Zero-based position among the day's punches, clock time ascending.
        let do_dia = load_batidas_do_dia(&pool.conn, funcionario_id, alvo.dat)?;
        let posicao = do_dia
            .iter()
            .position(|b| b.id == alvo.id)
            .ok_or_else(|| AppError::NotFound("punch not found".into()))?;
        let tip = TipoBatida::classificar(posicao);

        update_batida_retificada(
            &pool.conn,
            alvo.id,
            &justificativa,
            req.requisicao.anexo.as_deref(),
            tip,
        )?;

        // Secondary artifact: the operation log. Its failure must never
        // abort the rectification itself.
        let local = match (&req.latitude, &req.longitude) {
            (Some(lat), Some(lng)) => format!(" @{lat},{lng}"),
            _ => String::new(),
        };
        if let Err(e) = ttlog(
            &pool.conn,
            "retificar",
            &alvo.id.to_string(),
            &format!("{} [{}]{} {}", tipo.to_db_str(), emp, local, req.requisicao.titulo),
        ) {
            eprintln!("⚠️ Failed to write internal log: {e}");
        }

        let atualizada = find_batida_por_id(&pool.conn, alvo.id)?
            .ok_or_else(|| AppError::Internal("rectified punch vanished".into()))?;

        Ok(Retificado::BatidaAtualizada(atualizada))
    }
}
