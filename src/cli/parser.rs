use clap::{Parser, Subcommand};

/// Command-line interface definition for rponto
/// Operational front end for the time-clock engine over SQLite
#[derive(Parser)]
#[command(
    name = "rponto",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee time-clock engine: receive, register, rectify and sync punches over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for suspect fields")]
        check: bool,
    },

    /// Register or list employees
    Funcionario {
        #[arg(long, help = "Employee name (registers a new employee)")]
        nome: Option<String>,

        #[arg(long, help = "Company/tenant code", requires = "nome")]
        emp: Option<String>,

        #[arg(long = "listar", help = "List registered employees")]
        listar: bool,
    },

    /// Register one live punch with conflict detection and ordinal role
    Registrar {
        #[arg(long = "funcionario", help = "Employee id")]
        funcionario: Option<i64>,

        #[arg(long, help = "Company/tenant code")]
        emp: Option<String>,

        /// Date of the punch (YYYY-MM-DD)
        #[arg(long = "data")]
        data: Option<String>,

        /// Clock time (HH:MM); defaults to the server wall clock
        #[arg(long)]
        hora: Option<String>,

        #[arg(long = "locacao", help = "Location id")]
        locacao: Option<i64>,

        #[arg(long, help = "Submission origin tag (default: mobile)")]
        origem: Option<String>,

        #[arg(long)]
        lat: Option<f64>,

        #[arg(long)]
        lng: Option<f64>,

        #[arg(long, help = "Street address resolved by the client")]
        endereco: Option<String>,

        #[arg(long = "distancia", help = "Distance from the expected location, meters")]
        distancia: Option<i64>,
    },

    /// Reconcile a JSON batch of punches against the ledger (idempotent)
    Receber {
        #[arg(long, value_name = "FILE", help = "JSON file with an array of punches")]
        file: String,
    },

    /// Submit a correction request (justification or rectification)
    Retificar {
        #[arg(long, value_name = "FILE", help = "JSON file with the correction request")]
        file: String,
    },

    /// Project an employee's punch window for sync clients (prints JSON)
    Sincronizar {
        #[arg(long = "funcionario", help = "Employee id")]
        funcionario: i64,

        #[arg(long, help = "Window size in days (default: configured value)")]
        dias: Option<i64>,
    },

    /// Soft-delete a punch
    Excluir {
        #[arg(long, help = "Punch id")]
        id: Option<i64>,

        #[arg(long = "funcionario", help = "Employee id the punch belongs to")]
        funcionario: Option<i64>,
    },
}
