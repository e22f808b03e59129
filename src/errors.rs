use std::result::Result as StdResult;

use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use thiserror::Error;

use crate::auth::AuthError;

/// Unified error type for the application façade.
#[derive(Error, Debug)]
pub enum FinError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Backups require the json storage backend")]
    BackupsUnavailable,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, FinError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Fin(#[from] FinError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Fin(FinError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Fin(FinError::from(err))
    }
}
