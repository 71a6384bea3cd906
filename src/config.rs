//! Runtime configuration
//!
//! Every setting is looked up in the process environment first and then in a
//! `.env` file. [`Config::load`] runs once at startup; the resulting value is
//! shared read-only with the color client and the MCP server.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const API_KEY_VAR: &str = "IMAGGA_API_KEY";
pub const API_SECRET_VAR: &str = "IMAGGA_API_SECRET";
pub const ENDPOINT_VAR: &str = "IMAGGA_API_ENDPOINT";
pub const TIMEOUT_VAR: &str = "IMAGGA_TIMEOUT_SECS";
pub const OUTPUT_DIR_VAR: &str = "PALETTE_OUTPUT_DIR";
pub const RENDER_WORKERS_VAR: &str = "PALETTE_RENDER_WORKERS";

pub const DEFAULT_ENDPOINT: &str = "https://api.imagga.com/v2/colors";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "imgs/outputs";
pub const DEFAULT_RENDER_WORKERS: usize = 4;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} not found in environment variables or .env file")]
    Missing(&'static str),
    #[error("Failed to read env file '{}': {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// API key/secret pair sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { key: key.into(), secret: secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("key", &self.key).field("secret", &"<redacted>").finish()
    }
}

/// Settings that do not need credentials: where and how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Directory for generated file names when no output path is given
    pub output_dir: PathBuf,
    /// Upper bound on concurrently running render jobs
    pub render_workers: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            render_workers: DEFAULT_RENDER_WORKERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoint: String,
    pub timeout: Duration,
    pub render: RenderSettings,
}

impl Config {
    /// Config with the given credentials and defaults for everything else.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            render: RenderSettings::default(),
        }
    }

    /// Load configuration from the environment, falling back to `env_file`.
    ///
    /// A missing env file is not an error; missing credentials are.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        let source = EnvSource::load(env_file)?;
        Self::from_source(&source)
    }

    fn from_source(source: &EnvSource) -> Result<Self, ConfigError> {
        let key = source.get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let secret = source.get(API_SECRET_VAR).ok_or(ConfigError::Missing(API_SECRET_VAR))?;
        let timeout = match source.get(TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(parse_positive(TIMEOUT_VAR, &raw)?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Self {
            credentials: Credentials { key, secret },
            endpoint: source.get(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
            render: RenderSettings::from_source(source)?,
        })
    }
}

impl RenderSettings {
    /// Load render settings alone; used by commands that never call the API.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource::load(env_file)?)
    }

    fn from_source(source: &EnvSource) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(dir) = source.get(OUTPUT_DIR_VAR) {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = source.get(RENDER_WORKERS_VAR) {
            settings.render_workers = parse_positive(RENDER_WORKERS_VAR, &raw)? as usize;
        }
        Ok(settings)
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::Invalid { var, value: raw.to_string() })
}

/// Process environment layered over the contents of a `.env` file.
#[derive(Debug, Default)]
struct EnvSource {
    dotenv: HashMap<String, String>,
}

impl EnvSource {
    fn load(env_file: &Path) -> Result<Self, ConfigError> {
        if !env_file.is_file() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(env_file)
            .map_err(|source| ConfigError::EnvFile { path: env_file.to_path_buf(), source })?;
        Ok(Self { dotenv: parse_dotenv(&raw) })
    }

    /// Non-blank value of `var`, process environment first.
    fn get(&self, var: &str) -> Option<String> {
        std::env::var(var)
            .ok()
            .or_else(|| self.dotenv.get(var).cloned())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Parse `KEY=value` lines. Supports `#` comments, an `export ` prefix,
/// single or double quotes, and trailing ` # comment`s on unquoted values.
pub fn parse_dotenv(raw: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        let value = if quoted {
            &value[1..value.len() - 1]
        } else {
            value.split_once(" #").map(|(v, _)| v.trim_end()).unwrap_or(value)
        };
        out.insert(key.to_string(), value.to_string());
    }
    out
}
