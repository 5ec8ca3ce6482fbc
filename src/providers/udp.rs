//! UDP socket source

use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{info, trace, warn};

use crate::provider::DatagramSource;
use crate::{Result, TelemetryError};

/// Receives datagrams from a bound UDP socket
pub struct UdpSource {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buffer: Vec<u8>,
}

impl UdpSource {
    /// Bind a socket on `addr` with a receive buffer of `max_datagram_size` bytes
    pub async fn bind(addr: SocketAddr, max_datagram_size: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| TelemetryError::connection_failed(addr, "Failed to bind UDP socket", e))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| TelemetryError::connection_failed(addr, "Failed to read local address", e))?;

        info!(%local_addr, max_datagram_size, "Listening for telemetry");
        Ok(Self { socket, local_addr, buffer: vec![0u8; max_datagram_size] })
    }

    /// Address the socket is bound to (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait::async_trait]
impl DatagramSource for UdpSource {
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>> {
        let (len, peer) = self.socket.recv_from(&mut self.buffer).await.map_err(|e| {
            TelemetryError::connection_failed(self.local_addr, "Failed to receive datagram", e)
        })?;

        if len == self.buffer.len() {
            warn!(%peer, len, "Datagram filled the receive buffer and may be truncated");
        }
        trace!(%peer, len, "Received datagram");
        Ok(Some(self.buffer[..len].to_vec()))
    }

    fn describe(&self) -> String {
        format!("udp://{}", self.local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receives_datagrams_from_a_peer() {
        let mut source = UdpSource::bind("127.0.0.1:0".parse().unwrap(), 1500).await.unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[1, 2, 3, 4], source.local_addr()).await.unwrap();

        let datagram = source.next_datagram().await.unwrap().unwrap();
        assert_eq!(datagram, vec![1, 2, 3, 4]);
        assert!(source.describe().starts_with("udp://127.0.0.1:"));
    }

    #[tokio::test]
    async fn bind_conflict_is_a_connection_error() {
        let first = UdpSource::bind("127.0.0.1:0".parse().unwrap(), 1500).await.unwrap();
        match UdpSource::bind(first.local_addr(), 1500).await {
            Err(TelemetryError::Connection { addr, source, .. }) => {
                assert_eq!(addr, first.local_addr());
                assert!(source.is_some());
            }
            Ok(_) => panic!("Expected bind to fail"),
            Err(other) => panic!("Expected Connection error, got {:?}", other),
        }
    }
}
