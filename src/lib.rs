//! Type-safe decoder for the SMS UDP telemetry protocol used by Project CARS 2.
//!
//! The game broadcasts packed little-endian datagrams on UDP port 5606. Every
//! datagram starts with a 12-byte header naming its packet type and version;
//! large categories are split across several datagrams and reassembled here.
//! The newest complete packet of each category is kept in a shared snapshot
//! that any number of readers can decode from while the ingest task runs.
//!
//! # Features
//!
//! - **Catalog**: exact (type, version) dispatch with version mismatch detection
//! - **Reassembly**: bounded multi-part buffering with stale-part rejection
//! - **Typed records**: one struct per category, plus name-based dynamic access
//! - **Streams**: per-category subscriptions with optional rate limiting
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sms_udp::{EngineConfig, SmsUdp, UpdateRate};
//! use sms_udp::records::CarPhysics;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = SmsUdp::bind(&EngineConfig::default()).await?;
//!     let mut physics = connection.subscribe::<CarPhysics>(UpdateRate::Max(10));
//!
//!     while let Some(car) = physics.next().await {
//!         println!("Speed: {} m/s, gear {}", car.speed, car.gear());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Without the async layer, a [`PacketProcessor`] can be fed datagrams directly:
//!
//! ```rust
//! use std::sync::Arc;
//! use sms_udp::{IngestOutcome, PacketCategory, PacketProcessor, ReassemblyConfig, TelemetrySnapshot};
//!
//! let snapshot = Arc::new(TelemetrySnapshot::new());
//! let mut processor = PacketProcessor::new(Arc::clone(&snapshot), ReassemblyConfig::default());
//!
//! let mut datagram = vec![0u8; 22];
//! datagram[9] = 1; // one part
//! datagram[10] = 4; // game state
//! datagram[11] = 2;
//! datagram[15] = 24; // ambient temperature
//!
//! let outcome = processor.ingest(&datagram).unwrap();
//! assert_eq!(outcome, IngestOutcome::Updated(PacketCategory::GameState));
//! assert_eq!(snapshot.game_state().unwrap().ambient_temperature, 24);
//! ```

// Core types and error handling
pub mod catalog;
mod dynamic_record;
mod error;
pub mod records;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Decoding engine
pub mod processor;
pub mod reassembly;
pub mod snapshot;

// Stream-based telemetry architecture
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Ambient
pub mod config;
pub mod logging;

// Core exports
pub use catalog::PacketCatalog;
pub use dynamic_record::*;
pub use error::*;
pub use types::*;

pub use processor::{IngestOutcome, PacketProcessor, ProcessorStats};
pub use reassembly::{Reassembler, Reassembly, ReassemblyConfig, ReassemblyStats};
pub use records::{CategoryRecord, Record};
pub use snapshot::{RawPacket, TelemetrySnapshot};

// Main API exports
pub use config::EngineConfig;
pub use connection::Connection;
pub use provider::DatagramSource;
pub use providers::{ReplaySource, UdpSource};

/// Unified entry point for telemetry connections.
///
/// This factory provides a consistent API for listening to the game's live
/// UDP broadcast and for replaying captured datagrams.
///
/// # Examples
///
/// ## Live telemetry
/// ```rust,no_run
/// use sms_udp::{EngineConfig, SmsUdp};
///
/// #[tokio::main]
/// async fn main() -> sms_udp::Result<()> {
///     let connection = SmsUdp::bind(&EngineConfig::default()).await?;
///     // Use connection...
///     Ok(())
/// }
/// ```
///
/// ## Captured datagrams
/// ```rust,no_run
/// use sms_udp::{EngineConfig, SmsUdp};
///
/// #[tokio::main]
/// async fn main() -> sms_udp::Result<()> {
///     let capture: Vec<Vec<u8>> = Vec::new();
///     let connection = SmsUdp::replay(capture, &EngineConfig::default())?;
///     // Use connection...
///     Ok(())
/// }
/// ```
pub struct SmsUdp;

impl SmsUdp {
    /// Listen for live telemetry.
    ///
    /// Binds a UDP socket on `config.bind_addr` and starts the ingest task.
    /// The connection is returned immediately; subscriptions wait for the game
    /// to start broadcasting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The socket cannot be bound (for example, the port is in use)
    pub async fn bind(config: &EngineConfig) -> Result<Connection> {
        config.validate()?;
        let source = UdpSource::bind(config.bind_addr, config.max_datagram_size).await?;
        Ok(Connection::start(source, config.reassembly.to_config()))
    }

    /// Replay captured datagrams.
    ///
    /// Datagrams are processed back to back in order; the connection keeps the
    /// final snapshot after the capture is exhausted. Must be called from within
    /// a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn replay<I>(datagrams: I, config: &EngineConfig) -> Result<Connection>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        config.validate()?;
        Ok(Connection::start(ReplaySource::new(datagrams), config.reassembly.to_config()))
    }
}
