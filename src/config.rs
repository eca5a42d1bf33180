//! TOML configuration parsing.
//!
//! Every section and key is optional. A missing `--config` flag means the
//! built-in defaults are used. The listening port can be overridden by the
//! `PORT` environment variable and then by the `--port` CLI flag.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at `/` for the web client.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Serve `index.html` for unmatched static paths instead of a 404.
    #[serde(default)]
    pub spa_fallback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            spa_fallback: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_allowed_extension")]
    pub allowed_extension: String,
    /// Request body limit for uploads. `None` disables the limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<usize>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extension: default_allowed_extension(),
            max_bytes: None,
        }
    }
}

fn default_allowed_extension() -> String {
    ".txt".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Applies the `PORT` environment variable, if set, on top of the file values.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_port_override(std::env::var(PORT_ENV).ok().as_deref())
    }

    fn apply_port_override(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(raw) = value {
            self.server.port = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a valid port number, got '{}'", PORT_ENV, raw))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let ext = &self.upload.allowed_extension;
        if !ext.starts_with('.') || ext.len() < 2 {
            anyhow::bail!(
                "upload.allowed_extension must start with '.' and name an extension, got '{}'",
                ext
            );
        }

        if self.upload.max_bytes == Some(0) {
            anyhow::bail!("upload.max_bytes must be > 0 when set");
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "Unknown logging.level: '{}'. Must be trace, debug, info, warn, or error.",
                other
            ),
        }

        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
