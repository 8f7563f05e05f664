// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Parses and validates host, port, database and error-detail settings

use pagewise_config::constants::{
    PAGEWISE_DATABASE_PATH, PAGEWISE_EXPOSE_ERROR_DETAIL, PAGEWISE_HOST, PAGEWISE_MAX_CONNECTIONS,
    PAGEWISE_PORT, PAGEWISE_REQUEST_TIMEOUT_SECS,
};
use pagewise_storage::DEFAULT_MAX_CONNECTIONS;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 4100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("{var} must be true or false, got '{value}'")]
    InvalidFlag { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// `None` uses the default location under the pagewise home directory
    pub database_path: Option<PathBuf>,
    pub max_connections: u32,
    pub request_timeout: Duration,
    /// Include underlying error text in error responses
    pub expose_error_detail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database_path: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            expose_error_detail: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env::var(PAGEWISE_PORT) {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => defaults.port,
        };

        let host = match env::var(PAGEWISE_HOST) {
            Ok(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(raw.clone()))?,
            Err(_) => defaults.host,
        };

        let database_path = env::var(PAGEWISE_DATABASE_PATH)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let max_connections = match env::var(PAGEWISE_MAX_CONNECTIONS) {
            Ok(raw) => positive(PAGEWISE_MAX_CONNECTIONS, &raw)?,
            Err(_) => defaults.max_connections,
        };

        let request_timeout = match env::var(PAGEWISE_REQUEST_TIMEOUT_SECS) {
            Ok(raw) => Duration::from_secs(positive(PAGEWISE_REQUEST_TIMEOUT_SECS, &raw)?),
            Err(_) => defaults.request_timeout,
        };

        let expose_error_detail = match env::var(PAGEWISE_EXPOSE_ERROR_DETAIL) {
            Ok(raw) => parse_flag(PAGEWISE_EXPOSE_ERROR_DETAIL, &raw)?,
            Err(_) => defaults.expose_error_detail,
        };

        Ok(Config {
            host,
            port,
            database_path,
            max_connections,
            request_timeout,
            expose_error_detail,
        })
    }

    /// Apply a request timeout given in whole seconds; zero is rejected
    pub fn set_request_timeout_secs(
        &mut self,
        source: &'static str,
        secs: u64,
    ) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidNumber {
                var: source,
                value: secs.to_string(),
            });
        }
        self.request_timeout = Duration::from_secs(secs);
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port = raw.trim().parse::<u16>()?;
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}

fn positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
    }
}
