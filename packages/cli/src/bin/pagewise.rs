use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use pagewise_cli::{init_tracing, open_database, run_server, Config, ConfigError};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(about = "Serve cursor-paged session tasks and messages over HTTP")]
#[command(version)]
struct Cli {
    /// Address to bind (overrides PAGEWISE_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides PAGEWISE_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides PAGEWISE_DATABASE_PATH)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Keep everything in memory; data is lost on exit
    #[arg(long, conflicts_with = "database")]
    in_memory: bool,

    /// Per-request timeout in seconds (overrides PAGEWISE_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    request_timeout: Option<u64>,

    /// Include underlying error text in error responses
    #[arg(long)]
    expose_error_detail: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = &self.database {
            config.database_path = Some(database.clone());
        }
        if let Some(secs) = self.request_timeout {
            config.set_request_timeout_secs("--request-timeout", secs)?;
        }
        if self.expose_error_detail {
            config.expose_error_detail = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log);

    let config = cli.apply(Config::from_env()?)?;
    if config.port == 0 {
        return Err(ConfigError::PortOutOfRange(0).into());
    }

    let db = open_database(&config, cli.in_memory).await?;
    run_server(config, db).await
}
