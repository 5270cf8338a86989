use crate::utils::fuso::FUSO_PADRAO_HORAS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,

    /// Fixed offset of the server wall clock from UTC, in hours.
    #[serde(default = "default_fuso")]
    pub fuso_horario_horas: i64,

    /// Rolling window handed to sync clients, in days.
    #[serde(default = "default_janela_sincronizacao")]
    pub janela_sincronizacao_dias: i64,

    /// How far back reconciliation compares fingerprints, in days.
    /// Bounded on purpose; the ledger outlives any client's resend horizon.
    #[serde(default = "default_janela_reconciliacao")]
    pub janela_reconciliacao_dias: i64,
}

fn default_fuso() -> i64 {
    FUSO_PADRAO_HORAS
}

fn default_janela_sincronizacao() -> i64 {
    30
}

fn default_janela_reconciliacao() -> i64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            fuso_horario_horas: default_fuso(),
            janela_sincronizacao_dias: default_janela_sincronizacao(),
            janela_reconciliacao_dias: default_janela_reconciliacao(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rponto")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rponto.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rponto.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(format!("config serialization: {e}")))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }

    /// Report suspect fields for `config --check`.
    pub fn check(&self) -> Vec<&'static str> {
        let mut avisos = Vec::new();
        if self.database.trim().is_empty() {
            avisos.push("database");
        }
        if self.janela_sincronizacao_dias <= 0 {
            avisos.push("janela_sincronizacao_dias");
        }
        if self.janela_reconciliacao_dias <= 0 {
            avisos.push("janela_reconciliacao_dias");
        }
        avisos
    }
}
