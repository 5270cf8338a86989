use serde::Serialize;

/// Event type of a correction request.
///
/// Rectification-class types (AJUSTE, SISTEMA, APP) mutate the linked punch
/// directly; every other type produces a pending approval event.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TipoEvento {
    Justificativa,
    Atestado,
    Sistema,
    App,
    Outro,
    Afst,
    Ajuste,
}

impl TipoEvento {
    /// Map the request's free-text subcategory onto an event type.
    /// Case-insensitive; unrecognized or empty input falls back to
    /// JUSTIFICATIVA.
    pub fn da_subcategoria(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "atestado" => TipoEvento::Atestado,
            "sistema" => TipoEvento::Sistema,
            "app" => TipoEvento::App,
            "outro" => TipoEvento::Outro,
            "afst" => TipoEvento::Afst,
            "ajuste" => TipoEvento::Ajuste,
            _ => TipoEvento::Justificativa,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            TipoEvento::Justificativa => "JUSTIFICATIVA",
            TipoEvento::Atestado => "ATESTADO",
            TipoEvento::Sistema => "SISTEMA",
            TipoEvento::App => "APP",
            TipoEvento::Outro => "OUTRO",
            TipoEvento::Afst => "AFST",
            TipoEvento::Ajuste => "AJUSTE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "JUSTIFICATIVA" => Some(TipoEvento::Justificativa),
            "ATESTADO" => Some(TipoEvento::Atestado),
            "SISTEMA" => Some(TipoEvento::Sistema),
            "APP" => Some(TipoEvento::App),
            "OUTRO" => Some(TipoEvento::Outro),
            "AFST" => Some(TipoEvento::Afst),
            "AJUSTE" => Some(TipoEvento::Ajuste),
            _ => None,
        }
    }

    /// Rectification-class events bypass the approval queue and act on the
    /// punch itself.
    pub fn is_retificacao(&self) -> bool {
        matches!(
            self,
            TipoEvento::Ajuste | TipoEvento::Sistema | TipoEvento::App
        )
    }
}
