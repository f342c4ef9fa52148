/// Server configuration read from the environment.

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "amazon_sales_2025_INR.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CSV file served by the dashboard
    pub data_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `SALES_DATA`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let host = match lookup("HOST") {
            Some(h) if h.trim().is_empty() => return Err(ConfigError::Empty("HOST")),
            Some(h) => h.trim().to_string(),
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(p.clone()))?,
            None => defaults.port,
        };

        let data_path = match lookup("SALES_DATA") {
            Some(p) if p.trim().is_empty() => return Err(ConfigError::Empty("SALES_DATA")),
            Some(p) => PathBuf::from(p.trim()),
            None => defaults.data_path,
        };

        Ok(ServerConfig {
            host,
            port,
            data_path,
        })
    }
}
