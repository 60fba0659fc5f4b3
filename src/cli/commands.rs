//! CLI command implementations
//!
//! Boot order for `serve`: configuration, logging, storage, HTTP listener.

use std::path::Path;

use crate::config::{AppConfig, StorageBackend};
use crate::http_server::HttpServer;
use crate::log_event;
use crate::observability::{init_tracing, Event};
use crate::storage::{open_repository, SqliteTechnologyRepository};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve { config, port } => serve(&config, port).await,
        Command::Migrate { config } => migrate(&config),
    }
}

/// Boot and serve until shutdown
pub async fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    init_logging(&config)?;
    log_event!(Event::BootStart);
    log_event!(Event::ConfigLoaded, path = %config_path.display());

    let repository = open_repository(&config.storage).inspect_err(|e| {
        log_event!(Event::BootFailed, error = %e, code = e.code().code());
    })?;

    let server = HttpServer::new(&config, repository)?;
    server.start().await?;
    Ok(())
}

/// Open the configured SQLite database, which applies pending migrations
pub fn migrate(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    init_logging(&config)?;

    if config.storage.backend != StorageBackend::Sqlite {
        return Err(CliError::Unsupported(
            "migrate requires the sqlite storage backend".to_string(),
        ));
    }

    SqliteTechnologyRepository::open(&config.storage.path)?;
    Ok(())
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    Ok(AppConfig::load(path)?)
}

fn init_logging(config: &AppConfig) -> CliResult<()> {
    init_tracing(&config.logging).map_err(|e| CliError::Logging(e.to_string()))
}
