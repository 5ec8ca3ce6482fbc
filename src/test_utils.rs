//! Datagram builders for tests and benchmarks
//!
//! These helpers produce wire-exact datagrams without a running game, so the
//! decoding pipeline can be exercised deterministically.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{HEADER_SIZE, Header, LayoutDescriptor};

/// Builder for one datagram: a header followed by raw body bytes.
#[derive(Debug, Clone)]
pub struct DatagramBuilder {
    header: Header,
    body: Vec<u8>,
}

impl DatagramBuilder {
    /// Single-part datagram with an empty body.
    pub fn new(packet_type: u8, packet_version: u8) -> Self {
        Self {
            header: Header {
                packet_type,
                packet_version,
                partial_packet_index: 0,
                partial_packet_number: 1,
                ..Default::default()
            },
            body: Vec::new(),
        }
    }

    /// Single-part datagram with a zeroed body of the layout's exact length.
    pub fn for_layout(descriptor: &LayoutDescriptor) -> Self {
        Self::new(descriptor.packet_type, descriptor.packet_version)
            .body(&vec![0u8; descriptor.body_length()])
    }

    pub fn packet_number(mut self, packet_number: u32) -> Self {
        self.header.packet_number = packet_number;
        self
    }

    pub fn category_packet_number(mut self, category_packet_number: u32) -> Self {
        self.header.category_packet_number = category_packet_number;
        self
    }

    pub fn part(mut self, index: u8, total: u8) -> Self {
        self.header.partial_packet_index = index;
        self.header.partial_packet_number = total;
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    /// Overwrite body bytes at an offset measured from the start of the datagram.
    pub fn write_at(mut self, offset: usize, bytes: &[u8]) -> Self {
        let start = offset - HEADER_SIZE;
        let end = start + bytes.len();
        if self.body.len() < end {
            self.body.resize(end, 0);
        }
        self.body[start..end].copy_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut datagram = self.header.to_bytes().to_vec();
        datagram.extend_from_slice(&self.body);
        datagram
    }

    /// Split the body into `parts` datagrams of near-equal size, in index order.
    pub fn build_parts(&self, parts: u8) -> Vec<Vec<u8>> {
        let parts = parts.max(1);
        let chunk = self.body.len().div_ceil(usize::from(parts)).max(1);
        let mut chunks: Vec<&[u8]> = self.body.chunks(chunk).collect();
        chunks.resize(usize::from(parts), &[]);

        chunks
            .into_iter()
            .enumerate()
            .map(|(index, body)| {
                let header = Header {
                    partial_packet_index: index as u8,
                    partial_packet_number: parts,
                    ..self.header
                };
                let mut datagram = header.to_bytes().to_vec();
                datagram.extend_from_slice(body);
                datagram
            })
            .collect()
    }
}
