#![deny(clippy::all, clippy::pedantic)]

use std::fs;

use ips_rest::config::{self, LoadError, Settings};
use ips_rest::infra::error::InfraError;
use ips_rest::ClientError;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read key file: {0}")]
    KeyFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Telemetry(#[from] InfraError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to render output: {0}")]
    Render(serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Resolve settings from config files, environment and flags. A key file
/// wins over `IPS_REST_API_KEY`, which wins over configured keys.
pub fn settings_from_cli(cli: &Cli) -> Result<Settings, CliError> {
    let mut overrides = cli.overrides.clone();
    if let Some(path) = &cli.key_file {
        let key = fs::read_to_string(path).map_err(CliError::KeyFile)?;
        overrides.api_key = Some(key.trim().to_string());
    } else if let Some(key) = &cli.api_key_env {
        overrides.api_key = Some(key.clone());
    }
    Ok(config::load(&overrides)?)
}
