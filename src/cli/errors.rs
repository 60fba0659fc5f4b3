//! CLI-specific error types
//!
//! Every CLI error is fatal: the process prints it and exits non-zero.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http_server::ServerError;
use crate::storage::StorageError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("AGRI_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("AGRI_CLI_LOGGING_ERROR: {0}")]
    Logging(String),

    #[error("AGRI_CLI_STORAGE_ERROR: {0}")]
    Storage(#[from] StorageError),

    #[error("AGRI_CLI_SERVER_ERROR: {0}")]
    Server(#[from] ServerError),

    #[error("AGRI_CLI_UNSUPPORTED: {0}")]
    Unsupported(String),
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Config(_) => "AGRI_CLI_CONFIG_ERROR",
            CliError::Logging(_) => "AGRI_CLI_LOGGING_ERROR",
            CliError::Storage(_) => "AGRI_CLI_STORAGE_ERROR",
            CliError::Server(_) => "AGRI_CLI_SERVER_ERROR",
            CliError::Unsupported(_) => "AGRI_CLI_UNSUPPORTED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
