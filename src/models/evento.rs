use super::tipo_evento::TipoEvento;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Approval state of a correction event. Transitions out of Pendente are
/// owned by the external approval workflow, never by this engine.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Aprovacao {
    Pendente,
    Aprovado,
    Rejeitado,
}

impl Aprovacao {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Aprovacao::Pendente => "pendente",
            Aprovacao::Aprovado => "aprovado",
            Aprovacao::Rejeitado => "rejeitado",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(Aprovacao::Pendente),
            "aprovado" => Some(Aprovacao::Aprovado),
            "rejeitado" => Some(Aprovacao::Rejeitado),
            _ => None,
        }
    }
}

/// One rectification or justification request (row of `ponto_eventos`).
/// Created once by the correction engine; never updated by it afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PontoEvento {
    pub id: i64,
    pub emp: String,
    pub funcionario_id: i64,
    pub tipo: TipoEvento,
    pub data_inicio: NaiveDateTime,
    pub data_fim: Option<NaiveDateTime>,
    pub motivo: String,
    pub observacao: String,
    pub anexo: Option<String>,
    pub aprovacao: Aprovacao,
    pub aprovador_id: Option<i64>,
    pub aprovado_em: Option<NaiveDateTime>,
    pub created_at: String,
}
