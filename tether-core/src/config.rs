//! Server configuration.
//!
//! Defaults suit local development. [`ServerConfig::from_env`] overlays the
//! `TETHER_ADDR` and `TETHER_PENDING_TTL_SECS` environment variables, and the
//! struct also deserializes from any serde format (missing fields default).

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ADDR_VAR: &str = "TETHER_ADDR";
pub const PENDING_TTL_VAR: &str = "TETHER_PENDING_TTL_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,

    /// How long a rendered page waits for its live connection, in seconds.
    pub pending_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            pending_ttl_secs: 60,
        }
    }
}

impl ServerConfig {
    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    fn overlay(mut self, lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ADDR_VAR) {
            self.addr = value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: ADDR_VAR, value })?;
        }
        if let Some(value) = lookup(PENDING_TTL_VAR) {
            self.pending_ttl_secs = value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: PENDING_TTL_VAR, value })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.pending_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn overlay_reads_variables() {
        let config = ServerConfig::default()
            .overlay(|var| match var {
                ADDR_VAR => Some("0.0.0.0:8080".into()),
                PENDING_TTL_VAR => Some("5".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.pending_ttl_secs, 5);
    }

    #[test]
    fn overlay_rejects_garbage() {
        let err = ServerConfig::default()
            .overlay(|var| (var == PENDING_TTL_VAR).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: PENDING_TTL_VAR, .. }));
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = ServerConfig::from_json(r#"{ "pending_ttl_secs": 10 }"#).unwrap();
        assert_eq!(config.pending_ttl_secs, 10);
        assert_eq!(config.addr, ServerConfig::default().addr);
    }
}
