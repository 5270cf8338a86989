pub mod chave;
pub mod excluir;
pub mod normalizar;
pub mod receber;
pub mod registrar;
pub mod retificar;
pub mod sincronizar;
pub mod trava;
