use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

use crate::sql_generator::{Dialect, DialectConfig};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Render configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target SQL dialect
    pub dialect: Dialect,

    /// Numeric server version, e.g. 140000 for Postgres 14
    #[validate(range(
        min = 80000,
        max = 999999,
        message = "Server version must be between 80000 and 999999"
    ))]
    pub server_version: u32,

    /// Whether compiled plans are cached on disk
    pub cache_enabled: bool,

    /// Root directory of the compiled plan cache
    #[validate(length(min = 1, message = "Cache directory cannot be empty"))]
    pub cache_dir: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            server_version: 140000,
            cache_enabled: true,
            cache_dir: ".sqlnest".to_string(),
        }
    }
}

impl RenderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            dialect: parse_env_var("SQLNEST_DIALECT", "postgres")?,
            server_version: parse_env_var("SQLNEST_SERVER_VERSION", "140000")?,
            cache_enabled: parse_env_var("SQLNEST_CACHE_ENABLED", "true")?,
            cache_dir: env::var("SQLNEST_CACHE_DIR").unwrap_or_else(|_| ".sqlnest".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of this configuration
    pub fn with_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(dialect) = cli.dialect {
            self.dialect = dialect;
        }
        if let Some(server_version) = cli.server_version {
            self.server_version = server_version;
        }
        if let Some(cache_dir) = cli.cache_dir {
            self.cache_dir = cache_dir;
        }
        if cli.no_cache {
            self.cache_enabled = false;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn dialect_config(&self) -> DialectConfig {
        DialectConfig::new(self.dialect, self.server_version)
    }
}

/// CLI configuration (parsed from command line arguments)
///
/// Unset options leave the base configuration untouched.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub dialect: Option<Dialect>,
    pub server_version: Option<u32>,
    pub cache_dir: Option<String>,
    pub no_cache: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
