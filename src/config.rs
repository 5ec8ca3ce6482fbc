//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```rust
//! use sms_udp::EngineConfig;
//!
//! let config = EngineConfig::from_yaml_str("reassembly:\n  idle_timeout_ms: 500\n").unwrap();
//! assert_eq!(config.reassembly.idle_timeout_ms, 500);
//! assert_eq!(config.max_datagram_size, 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::reassembly::ReassemblyConfig;
use crate::types::HEADER_SIZE;
use crate::{Result, TelemetryError};

/// UDP port the game sends telemetry to.
pub const DEFAULT_PORT: u16 = 5606;

/// Largest datagram the game sends.
pub const MAX_DATAGRAM_SIZE: usize = 1500;

/// Top-level configuration for a telemetry connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Local address to receive datagrams on
    pub bind_addr: SocketAddr,
    /// Receive buffer size; longer datagrams are truncated by the socket
    pub max_datagram_size: usize,
    pub reassembly: ReassemblySettings,
}

/// Reassembly limits as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassemblySettings {
    pub idle_timeout_ms: u64,
    pub max_in_flight: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_datagram_size: MAX_DATAGRAM_SIZE,
            reassembly: ReassemblySettings::default(),
        }
    }
}

impl Default for ReassemblySettings {
    fn default() -> Self {
        let defaults = ReassemblyConfig::default();
        Self {
            idle_timeout_ms: defaults.idle_timeout.as_millis() as u64,
            max_in_flight: defaults.max_in_flight,
        }
    }
}

impl ReassemblySettings {
    pub fn to_config(&self) -> ReassemblyConfig {
        ReassemblyConfig {
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            max_in_flight: self.max_in_flight,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config(format!("Invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| TelemetryError::config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_datagram_size < HEADER_SIZE {
            return Err(TelemetryError::config(format!(
                "max_datagram_size {} is smaller than the {}-byte header",
                self.max_datagram_size, HEADER_SIZE
            )));
        }
        if self.reassembly.idle_timeout_ms == 0 {
            return Err(TelemetryError::config("reassembly.idle_timeout_ms must be non-zero"));
        }
        if self.reassembly.max_in_flight == 0 {
            return Err(TelemetryError::config("reassembly.max_in_flight must be non-zero"));
        }
        Ok(())
    }

    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.bind_addr.port(), 5606);
        assert_eq!(config.reassembly.to_config(), ReassemblyConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let yaml = "bind_addr: 127.0.0.1:6000\nmax_datagram_size: 2048\nreassembly:\n  max_in_flight: 4\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:6000".parse().unwrap());
        assert_eq!(config.max_datagram_size, 2048);
        assert_eq!(config.reassembly.max_in_flight, 4);
        assert_eq!(config.reassembly.idle_timeout_ms, 250);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for yaml in [
            "max_datagram_size: 8",
            "reassembly:\n  idle_timeout_ms: 0",
            "reassembly:\n  max_in_flight: 0",
            "bind_addr: not-an-address",
        ] {
            let error = EngineConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(error, TelemetryError::Config { .. }), "{yaml}: {error:?}");
            assert!(!error.is_recoverable());
        }
    }

    #[test]
    fn yaml_round_trip() {
        let config = EngineConfig::default().with_bind_addr("127.0.0.1:5607".parse().unwrap());
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(EngineConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
