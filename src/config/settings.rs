//! Process-level settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

/// Where the server listens and where it finds its policy and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Listen address (`SERVER_ADDR`, default `127.0.0.1:8000`).
    pub server_addr: SocketAddr,
    /// Policy directory (`ENGINE_CONFIG_DIR`, default `./config/default`).
    pub config_dir: PathBuf,
    /// Record store directory (`DB_PATH`, default `data`).
    pub data_dir: PathBuf,
}

impl ServerSettings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8000".to_string());
        let server_addr = raw_addr.parse().map_err(|_| EngineError::Validation {
            field: "SERVER_ADDR".to_string(),
            message: format!("'{}' is not a socket address", raw_addr),
        })?;

        Ok(Self {
            server_addr,
            config_dir: lookup("ENGINE_CONFIG_DIR")
                .unwrap_or_else(|| "./config/default".to_string())
                .into(),
            data_dir: lookup("DB_PATH").unwrap_or_else(|| "data".to_string()).into(),
        })
    }
}
