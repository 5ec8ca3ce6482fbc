//! Source trait for raw datagrams

use crate::Result;

/// Trait for datagram sources
///
/// Sources abstract over where datagrams come from (a UDP socket, a capture
/// being replayed) and handle their own timing internally. Contents are
/// untrusted and may be any length; validation happens in the processor.
#[async_trait::async_trait]
pub trait DatagramSource: Send + 'static {
    /// Get the next datagram
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - Datagram received
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - Receive failed; the driver retries with backoff
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}
