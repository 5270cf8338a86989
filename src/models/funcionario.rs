use serde::Serialize;

/// Minimal employee record: the engine only needs identity and the
/// company/tenant code copied onto correction events.
#[derive(Debug, Clone, Serialize)]
pub struct Funcionario {
    pub id: i64,
    pub emp: String,
    pub nome: String,
    pub deleted_at: Option<String>,
}
