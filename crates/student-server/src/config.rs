//! Server configuration
//!
//! Defaults, overridden by `STUDENTS_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;

/// Storage backend behind the record service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_path: String,
    pub backend: Backend,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("STUDENTS"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:8080")?
            .set_default("database_path", "./data/students.db")?
            .set_default("backend", "sqlite")?
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", self.bind_address))
    }
}
