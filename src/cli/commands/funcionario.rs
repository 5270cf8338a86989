use crate::cli::parser::Commands;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_funcionario, load_funcionarios};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

/// Register or list employees.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Funcionario { nome, emp, listar } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        if *listar {
            for f in load_funcionarios(&pool.conn)? {
                println!("{:>5}  [{}]  {}", f.id, f.emp, f.nome);
            }
            return Ok(());
        }

        let nome = nome
            .as_deref()
            .ok_or_else(|| AppError::validation(vec!["nome"]))?;
        let emp = emp
            .as_deref()
            .ok_or_else(|| AppError::validation(vec!["emp"]))?;

        let f = insert_funcionario(&pool.conn, emp, nome)?;
        success(format!("Employee {} registered with id {}.", f.nome, f.id));
    }

    Ok(())
}
