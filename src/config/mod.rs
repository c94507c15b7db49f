mod file_config;

pub use file_config::FileConfig;

use crate::api::RequestsLoggingLevel;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use reqwest::Url;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub history_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_sec: DEFAULT_TIMEOUT_SEC,
            logging_level: RequestsLoggingLevel::default(),
            history_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend root, without a trailing slash.
    pub base_url: String,
    pub timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub history_file: Option<PathBuf>,
    /// Default tracing directive, `LOG_LEVEL` still overrides it.
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let base_url = file.base_url.unwrap_or_else(|| cli.base_url.clone());
        let parsed =
            Url::parse(&base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Base URL must use http or https: {}", base_url);
        }

        let timeout_sec = file.timeout_sec.unwrap_or(cli.timeout_sec);
        if timeout_sec == 0 {
            bail!("timeout_sec must be greater than 0");
        }

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .with_context(|| format!("Unknown logging_level in config file: {}", s))?,
            None => cli.logging_level,
        };

        let log_level = match file.log_level {
            Some(s) => s
                .parse::<LevelFilter>()
                .with_context(|| format!("Unknown log_level in config file: {}", s))?,
            None => DEFAULT_LOG_LEVEL,
        };

        let history_file = file
            .history_file
            .map(PathBuf::from)
            .or_else(|| cli.history_file.clone());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_sec,
            logging_level,
            history_file,
            log_level,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
