//! Dialect and server version pinned for one render

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First server version with `websearch_to_tsquery`
pub const WEBSEARCH_MIN_VERSION: u32 = 110000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    /// No full-text ranking or headline functions
    Mysql,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
        }
    }

    pub fn supports_full_text(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown SQL dialect '{0}' (expected postgres or mysql)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Dialect tag plus the version reported by the target connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectConfig {
    pub dialect: Dialect,
    pub server_version: u32,
}

impl DialectConfig {
    pub fn new(dialect: Dialect, server_version: u32) -> Self {
        DialectConfig {
            dialect,
            server_version,
        }
    }

    /// Whether the newer `websearch_to_tsquery` parser is available.
    pub fn supports_websearch(&self) -> bool {
        self.server_version >= WEBSEARCH_MIN_VERSION
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        DialectConfig::new(Dialect::Postgres, 140000)
    }
}
