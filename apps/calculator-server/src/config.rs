//! Layered application configuration.
//!
//! Sources, lowest to highest priority:
//! 1) compiled defaults -> 2) YAML file (if provided) -> 3) env (`APP__*`) -> 4) CLI overrides

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use expr_calculator::CalculatorConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Wall-clock budget for a single request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_ms: default_request_timeout_ms(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_owned()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_body_limit_bytes() -> usize {
    16 * 1024
}

impl ServerConfig {
    /// # Errors
    /// Returns an error if `bind_addr` is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {e}", self.bind_addr))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            allow_credentials: false,
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_owned()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "OPTIONS"].map(str::to_owned).to_vec()
}

fn default_allowed_headers() -> Vec<String> {
    vec!["content-type".to_owned()]
}

fn default_max_age_seconds() -> u64 {
    600
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Console level: `trace`, `debug`, `info`, `warn`, `error` or `off`.
    #[serde(default = "default_console_level")]
    pub console_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: default_console_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_console_level() -> String {
    "info".to_owned()
}

impl AppConfig {
    /// Build the layered configuration, reading `path` when given.
    ///
    /// # Errors
    /// Returns an error if `path` does not exist, a source cannot be parsed,
    /// or the merged configuration is invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns an error if any section holds an unusable value.
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;
        if self.server.request_timeout_ms == 0 {
            bail!("server.request_timeout_ms must be greater than zero");
        }
        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes must be greater than zero");
        }
        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| o == "*") {
            bail!(
                "CORS misconfiguration: allowed_origins=['*'] cannot be combined with \
                 allow_credentials=true"
            );
        }
        self.calculator.validate()?;
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// # Errors
    /// Returns an error if the configured bind address cannot be parsed.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>) -> Result<()> {
        if let Some(port) = port {
            let mut addr = self.server.socket_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
