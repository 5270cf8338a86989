pub mod batida;
pub mod evento;
pub mod funcionario;
pub mod tipo_batida;
pub mod tipo_evento;
