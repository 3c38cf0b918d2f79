//! Server configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use waymark_types::VerificationParams;

use crate::error::RpcError;

/// Configuration for the Waymark server.
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to allow cross-origin requests from the map client.
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Verification parameters. Tunable per deployment; defaults to the
    /// live Waymark configuration.
    #[serde(default)]
    pub params: VerificationParams,
}

impl ServerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, RpcError> {
        toml::from_str(contents).map_err(|e| RpcError::InvalidRequest(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RpcError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RpcError::Server(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            enable_cors: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: VerificationParams::default(),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    8090
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, 8090);
        assert!(config.enable_cors);
        assert_eq!(config.params.super_weight, 4.0);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = ServerConfig::from_toml_str("port = 9000\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn params_can_be_tuned_from_toml() {
        let toml = r#"
            [params]
            super_weight = 4.0
            trusted_weight = 2.0
            base_weight = 1.0
            accuracy_threshold = 0.8
            reputation_threshold = 70
            decay_rate_per_hour = 0.01
            required_weight_base = 5.0
            required_weight_per_vote = 0.2
            agreement_ratio = 0.8
            rejection_ratio = 0.6
            dispute_margin = 2.0
            dispute_min_weight = 3.0
            promotion_threshold = 10
            max_cas_retries = 5
        "#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.params.decay_rate_per_hour, 0.01);
    }
}
