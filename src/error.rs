//! Error types for telemetry decoding.
//!
//! Every error produced while handling one datagram is local to that datagram:
//! the processor logs it, counts it and moves on to the next one. Nothing in
//! this module represents a fatal condition for the decoding engine.
//!
//! ## Error Categories
//!
//! - **Framing Errors**: datagram shorter than the common header, bad part indices
//! - **Catalog Errors**: unknown packet type or unsupported packet version
//! - **Layout Errors**: body length does not match the cataloged layout
//! - **Access Errors**: no data received yet for a category, unknown field names
//! - **Transport Errors**: socket setup and receive failures in the async driver
//!
//! ## Severity
//!
//! Errors carry the log level the processor uses when it skips a datagram:
//!
//! ```rust
//! use sms_udp::TelemetryError;
//! use tracing::Level;
//!
//! let unknown = TelemetryError::UnknownType { packet_type: 42 };
//! assert_eq!(unknown.severity(), Level::DEBUG);
//!
//! let stale = TelemetryError::VersionMismatch { packet_type: 0, supported: vec![4], found: 5 };
//! assert_eq!(stale.severity(), Level::ERROR);
//! assert!(stale.indicates_outdated_tables());
//! ```

use std::net::SocketAddr;
use thiserror::Error;
use tracing::Level;

use crate::types::PacketCategory;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Datagram too short: {len} bytes, header needs {required}")]
    TooShort { len: usize, required: usize },

    #[error("Unknown packet type {packet_type}")]
    UnknownType { packet_type: u8 },

    #[error("Unsupported version {found} for packet type {packet_type} (supported: {supported:?})")]
    VersionMismatch { packet_type: u8, supported: Vec<u8>, found: u8 },

    #[error("Length mismatch for {category}: expected {expected} bytes, got {actual}")]
    LengthMismatch { category: PacketCategory, expected: usize, actual: usize },

    #[error("Invalid part index {index} of {total} for packet type {packet_type}")]
    InvalidPartIndex { packet_type: u8, index: u8, total: u8 },

    #[error("No {category} packet received yet")]
    Unavailable { category: PacketCategory },

    #[error("Field '{field}' not found in {category} layout")]
    FieldNotFound { category: PacketCategory, field: String },

    #[error("Out of bounds read at offset {offset} (need {needed} bytes, buffer has {len})")]
    Memory { offset: usize, needed: usize, len: usize },

    #[error("Socket error on {addr}: {reason}")]
    Connection {
        addr: SocketAddr,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {details}")]
    Config { details: String },
}

impl TelemetryError {
    /// Returns whether processing can continue with the next datagram.
    ///
    /// Only transport-level failures are treated as unrecoverable; every
    /// per-datagram decoding error leaves the engine in a consistent state.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TelemetryError::TooShort { .. }
            | TelemetryError::UnknownType { .. }
            | TelemetryError::VersionMismatch { .. }
            | TelemetryError::LengthMismatch { .. }
            | TelemetryError::InvalidPartIndex { .. }
            | TelemetryError::Unavailable { .. }
            | TelemetryError::FieldNotFound { .. }
            | TelemetryError::Memory { .. } => true,
            TelemetryError::Connection { .. } | TelemetryError::Config { .. } => false,
        }
    }

    /// Returns true when the error implies the decoding tables are older than the game.
    pub fn indicates_outdated_tables(&self) -> bool {
        matches!(self, TelemetryError::VersionMismatch { .. })
    }

    /// Log level used when a datagram is skipped because of this error.
    pub fn severity(&self) -> Level {
        match self {
            TelemetryError::VersionMismatch { .. }
            | TelemetryError::Connection { .. }
            | TelemetryError::Config { .. } => Level::ERROR,
            TelemetryError::LengthMismatch { .. }
            | TelemetryError::InvalidPartIndex { .. }
            | TelemetryError::Memory { .. } => Level::WARN,
            TelemetryError::TooShort { .. } | TelemetryError::UnknownType { .. } => Level::DEBUG,
            TelemetryError::Unavailable { .. } | TelemetryError::FieldNotFound { .. } => {
                Level::TRACE
            }
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::TooShort { .. } => vec![
                "Check that the sender is the game's UDP telemetry stream",
                "Verify the receive buffer is at least the maximum datagram size",
            ],
            TelemetryError::UnknownType { .. } => vec![
                "Ignore the datagram; unknown categories are skipped",
                "Check that no other application sends to the telemetry port",
            ],
            TelemetryError::VersionMismatch { .. } => vec![
                "Update this library to a release that knows the new layout",
                "Set the game's UDP protocol version to Project CARS 2",
            ],
            TelemetryError::LengthMismatch { .. } => vec![
                "Check for truncated datagrams or a misconfigured receive buffer",
                "Verify the game's UDP protocol version setting",
            ],
            TelemetryError::InvalidPartIndex { .. } => vec![
                "Ignore the datagram; the header is corrupted",
                "Check the network path for packet corruption",
            ],
            TelemetryError::Unavailable { .. } => vec![
                "Wait for the game to send this category",
                "Enable UDP telemetry in the game's system options",
            ],
            TelemetryError::FieldNotFound { .. } => vec![
                "Check field name spelling",
                "List available fields through the layout descriptor",
            ],
            TelemetryError::Memory { .. } => vec![
                "Validate buffer length against the layout before decoding",
                "Report the datagram as a decoder bug",
            ],
            TelemetryError::Connection { .. } => vec![
                "Check that the port is not already in use",
                "Verify firewall rules allow inbound UDP on the telemetry port",
                "Try binding to a different address",
            ],
            TelemetryError::Config { .. } => vec![
                "Check configuration values against their documented ranges",
                "Remove the entry to fall back to the default",
            ],
        }
    }

    /// Helper constructor for socket errors.
    pub fn connection_failed(
        addr: SocketAddr,
        reason: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        TelemetryError::Connection { addr, reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        TelemetryError::Config { details: details.into() }
    }

    /// Helper constructor for out-of-bounds reads.
    pub fn out_of_bounds(offset: usize, needed: usize, len: usize) -> Self {
        TelemetryError::Memory { offset, needed, len }
    }
}
