//! Layered configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `userd.toml` in the working directory, then `USERD_*` environment
//! variables with `__` between nesting levels (`USERD_SERVER__PORT=8080`).

use std::net::SocketAddr;

use serde::Deserialize;

use crate::dispatcher::DEFAULT_MAX_BODY_SIZE;
use crate::error::Error;

/// File name, without extension, looked up by [`Config::load`].
pub const DEFAULT_CONFIG_FILE: &str = "userd";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HttpConfig {
    /// Largest accepted request body, in bytes.
    pub max_body_size: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `userd=debug`.
    pub level: String,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads from `path` (extension optional, file optional) plus the
    /// environment.
    pub fn load_from(path: &str) -> Result<Self, Error> {
        let max_body_size = i64::try_from(DEFAULT_MAX_BODY_SIZE).unwrap_or(i64::MAX);

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("http.max_body_size", max_body_size)?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("USERD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::Addr(addr))
    }
}
