use crate::cli::parser::Commands;
use crate::core::registrar::{RegistrarEntrada, RegistrarLogic};
use crate::core::trava::TravasDia;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use chrono::Utc;

/// Register one live punch.
pub fn handle(cmd: &Commands, cfg: &crate::config::Config) -> AppResult<()> {
    if let Commands::Registrar {
        funcionario,
        emp,
        data,
        hora,
        locacao,
        origem,
        lat,
        lng,
        endereco,
        distancia,
    } = cmd
    {
        //
        // 1. Parse date (presence is validated by the engine)
        //
        let dat = match data {
            Some(d) => {
                Some(date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?)
            }
            None => None,
        };

        //
        // 2. Parse time (optional)
        //
        let hora_parsed = parse_optional_time(hora.as_ref())?;

        //
        // 3. Open DB and run the engine
        //
        let mut pool = DbPool::new(&cfg.database)?;
        let travas = TravasDia::new();

        let entrada = RegistrarEntrada {
            funcionario_id: *funcionario,
            emp: emp.clone(),
            dat,
            hora: hora_parsed,
            locacao_id: *locacao,
            origem: origem.clone(),
            lat: *lat,
            lng: *lng,
            endereco: endereco.clone(),
            distancia_m: *distancia,
            ..RegistrarEntrada::default()
        };

        let batida = RegistrarLogic::aplicar(&mut pool, &travas, cfg, &entrada, Utc::now())?;

        if let Err(e) = ttlog(
            &pool.conn,
            "registrar",
            &batida.id.to_string(),
            &format!(
                "punch {} for employee {} on {} at {}",
                batida.tip.map(|t| t.to_db_str()).unwrap_or("-"),
                batida.funcionario_id,
                batida.dat_str(),
                batida.hora_str()
            ),
        ) {
            eprintln!("⚠️ Failed to write internal log: {}", e);
        }

        success(format!(
            "Punch registered: id {} ({}) on {} at {}.",
            batida.id,
            batida.tip.map(|t| t.to_db_str()).unwrap_or("-"),
            batida.dat_str(),
            batida.hora_str()
        ));
    }

    Ok(())
}
