use serde::Serialize;

/// Ordinal role of a punch within its employee-day: the fixed daily
/// sequence first-in, first-out, second-in, second-out, then overflow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TipoBatida {
    Ent1,
    Sai1,
    Ent2,
    Sai2,
    Ext,
}

impl TipoBatida {
    /// Single source of truth for punch ordering semantics.
    ///
    /// `anteriores` is the number of punches already on record for the
    /// employee-day; the result is the role of the NEXT punch. Total over
    /// every non-negative count.
    pub fn classificar(anteriores: usize) -> Self {
        match anteriores {
            0 => TipoBatida::Ent1,
            1 => TipoBatida::Sai1,
            2 => TipoBatida::Ent2,
            3 => TipoBatida::Sai2,
            _ => TipoBatida::Ext,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TipoBatida::Ent1 => "ent1",
            TipoBatida::Sai1 => "sai1",
            TipoBatida::Ent2 => "ent2",
            TipoBatida::Sai2 => "sai2",
            TipoBatida::Ext => "ext",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ent1" => Some(TipoBatida::Ent1),
            "sai1" => Some(TipoBatida::Sai1),
            "ent2" => Some(TipoBatida::Ent2),
            "sai2" => Some(TipoBatida::Sai2),
            "ext" => Some(TipoBatida::Ext),
            _ => None,
        }
    }

    pub fn is_entrada(&self) -> bool {
        matches!(self, TipoBatida::Ent1 | TipoBatida::Ent2)
    }

    pub fn is_saida(&self) -> bool {
        matches!(self, TipoBatida::Sai1 | TipoBatida::Sai2)
    }
}
