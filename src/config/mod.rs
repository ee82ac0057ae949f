//! Configuration layer: typed settings with layered precedence (file → env → overrides).

use std::{path::PathBuf, str::FromStr};

use clap::{Args, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const LOCAL_CONFIG_BASENAME: &str = "ips-rest";
const ENV_PREFIX: &str = "IPS_REST";

/// Values supplied programmatically or on the command line. They win over
/// every other source.
#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Community base URL, e.g. <https://community.example.com>
    #[arg(long = "site", value_name = "URL", env = "IPS_REST_SITE")]
    pub site: Option<String>,

    /// API key; filled in by the caller, never taken from argv.
    #[arg(skip)]
    pub api_key: Option<String>,

    /// Skip TLS certificate validation.
    #[arg(
        long = "insecure",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub insecure: Option<bool>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub api_key: String,
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → overrides).
pub fn load(overrides: &Overrides) -> Result<Settings, LoadError> {
    let mut raw = load_raw(overrides)?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

fn load_raw(overrides: &Overrides) -> Result<RawSettings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    Ok(builder.build()?.try_deserialize()?)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    client: RawClientSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(site) = overrides.site.as_ref() {
            self.client.base_url = Some(site.clone());
        }
        if let Some(key) = overrides.api_key.as_ref() {
            self.client.api_key = Some(key.clone());
        }
        if let Some(insecure) = overrides.insecure {
            self.client.accept_invalid_certs = Some(insecure);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { client, logging } = raw;

        let client = build_client_settings(client)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self { client, logging })
    }
}

fn build_client_settings(client: RawClientSettings) -> Result<ClientSettings, LoadError> {
    let raw_url = client
        .base_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| LoadError::invalid("client.base_url", "is required"))?;
    let base_url = Url::parse(raw_url.trim())
        .map_err(|err| LoadError::invalid("client.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "client.base_url",
            format!("unsupported scheme `{}`", base_url.scheme()),
        ));
    }

    let api_key = client
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| LoadError::invalid("client.api_key", "is required"))?;

    Ok(ClientSettings {
        base_url,
        api_key,
        accept_invalid_certs: client.accept_invalid_certs.unwrap_or(false),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawClientSettings {
    base_url: Option<String>,
    api_key: Option<String>,
    accept_invalid_certs: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
