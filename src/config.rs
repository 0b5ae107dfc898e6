//! Server configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::label::validation::DEFAULT_MAX_FIELD_CHARS;
use crate::label::ArchiveLayout;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOGO_PATH: &str = "./assets/logo.png";
const DEFAULT_MAX_CASES: u32 = 500;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be 'perCase' or 'combined', got '{value}'")]
    InvalidLayout { key: &'static str, value: String },
    #[error("{key} must list explicit origins; use '*' alone to allow any origin")]
    MixedWildcardOrigin { key: &'static str },
}

/// Runtime settings for the label service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Logo image drawn on every label.
    pub logo_path: PathBuf,
    /// Upper bound on `numberOfCases` for a single request.
    pub max_cases: u32,
    /// Upper bound on the length of each text field, in characters.
    pub max_field_chars: usize,
    /// Number of pages rendered concurrently for one request.
    pub render_workers: usize,
    pub default_layout: ArchiveLayout,
    pub cors_origins: CorsOrigins,
}

/// Origins allowed to call the service from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            max_cases: DEFAULT_MAX_CASES,
            max_field_chars: DEFAULT_MAX_FIELD_CHARS,
            render_workers: default_render_workers(),
            default_layout: ArchiveLayout::default(),
            cors_origins: CorsOrigins::List(vec![DEFAULT_CORS_ORIGIN.to_string()]),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    /// for every key the lookup does not know.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(value) => parse_positive::<u16>("PORT", &value)?,
            None => defaults.port,
        };

        let logo_path = lookup("LOGO_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.logo_path);

        let max_cases = match lookup("MAX_CASES_PER_REQUEST") {
            Some(value) => parse_positive::<u32>("MAX_CASES_PER_REQUEST", &value)?,
            None => defaults.max_cases,
        };

        let max_field_chars = match lookup("MAX_FIELD_CHARS") {
            Some(value) => parse_positive::<usize>("MAX_FIELD_CHARS", &value)?,
            None => defaults.max_field_chars,
        };

        let render_workers = match lookup("RENDER_WORKERS") {
            Some(value) => parse_positive::<usize>("RENDER_WORKERS", &value)?,
            None => defaults.render_workers,
        };

        let default_layout = match lookup("DEFAULT_ARCHIVE_LAYOUT") {
            Some(value) => {
                ArchiveLayout::parse(&value).ok_or(ConfigError::InvalidLayout {
                    key: "DEFAULT_ARCHIVE_LAYOUT",
                    value,
                })?
            }
            None => defaults.default_layout,
        };

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(value) => parse_origins("CORS_ALLOWED_ORIGINS", &value)?,
            None => defaults.cors_origins,
        };

        Ok(Self {
            host,
            port,
            logo_path,
            max_cases,
            max_field_chars,
            render_workers,
            default_layout,
            cors_origins,
        })
    }
}

fn parse_positive<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_origins(key: &'static str, value: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if !origins.iter().any(|o| o == "*") {
        return Ok(CorsOrigins::List(origins));
    }
    if origins.len() == 1 {
        Ok(CorsOrigins::Any)
    } else {
        Err(ConfigError::MixedWildcardOrigin { key })
    }
}

fn default_render_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
