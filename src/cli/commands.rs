//! CLI command implementations
//!
//! Both commands load the same JSON configuration file. `init` is
//! idempotent: an existing config is reused, an existing database only
//! gains the schema it is missing.

use std::fs;
use std::path::Path;

use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::db::UserStore;
use crate::http::{HttpServer, HttpServerConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments, set up logging, and dispatch to the command.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli.command).await
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    // Tests may install their own subscriber first; losing that race is fine.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Dispatch a parsed command.
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config).await,
    }
}

/// Write a default config file if none exists, then create the database
/// file and schema so `serve` starts against a ready store.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = if config_path.exists() {
        load_config(config_path)?
    } else {
        let config = HttpServerConfig::default();
        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| CliError::config(config_path, e.to_string()))?;
        fs::write(config_path, content)
            .map_err(|e| CliError::config(config_path, format!("write failed: {}", e)))?;
        info!("wrote default config to {}", config_path.display());
        config
    };

    UserStore::open(Path::new(&config.db_path))?;
    info!("user store ready at {}", config.db_path);
    Ok(())
}

/// Load config, open the store, and serve until the process is stopped.
pub async fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = UserStore::open(Path::new(&config.db_path))?;
    info!("opened user store at {}", config.db_path);

    HttpServer::new(config, store).start().await?;
    Ok(())
}

/// Read and validate a configuration file.
fn load_config(path: &Path) -> CliResult<HttpServerConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config(path, format!("read failed: {}", e)))?;

    let config: HttpServerConfig = serde_json::from_str(&content)
        .map_err(|e| CliError::config(path, format!("invalid JSON: {}", e)))?;

    config.validate().map_err(|e| CliError::config(path, e))?;

    Ok(config)
}
