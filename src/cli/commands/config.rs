use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// View or check the configuration file.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            let yaml = serde_yaml::to_string(cfg)
                .map_err(|e| crate::errors::AppError::Config(e.to_string()))?;
            println!("{yaml}");
        }

        if *check {
            let avisos = cfg.check();
            if avisos.is_empty() {
                success("Configuration looks sane.");
            } else {
                for campo in avisos {
                    warning(format!("Suspect configuration field: {campo}"));
                }
            }
        }
    }

    Ok(())
}
