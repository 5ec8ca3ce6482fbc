//! Datagram pipeline: header, catalog, reassembly, length check, snapshot.
//!
//! One processor owns the ingest path. Every datagram either updates exactly
//! one snapshot slot or leaves the snapshot untouched; a failure on one
//! datagram never affects the next.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, debug, error, trace, warn};

use crate::catalog::PacketCatalog;
use crate::reassembly::{Reassembler, Reassembly, ReassemblyConfig, ReassemblyStats};
use crate::snapshot::TelemetrySnapshot;
use crate::types::{PacketCategory, parse_header};
use crate::{Result, TelemetryError};

/// What happened to one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A complete packet was stored in its category slot
    Updated(PacketCategory),
    /// A part was buffered, waiting for the rest of its packet
    Pending,
    /// The datagram was obsolete and dropped without error
    Discarded,
}

/// Ingest counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProcessorStats {
    pub datagrams: u64,
    pub updates: u64,
    pub pending: u64,
    pub discarded: u64,
    pub too_short: u64,
    pub unknown_type: u64,
    pub version_mismatch: u64,
    pub length_mismatch: u64,
    pub invalid_part_index: u64,
    pub reassembly: ReassemblyStats,
}

impl ProcessorStats {
    /// Datagrams rejected with an error.
    pub fn errors(&self) -> u64 {
        self.too_short
            + self.unknown_type
            + self.version_mismatch
            + self.length_mismatch
            + self.invalid_part_index
    }
}

/// Runs datagrams through the decoding pipeline into a shared snapshot.
#[derive(Debug)]
pub struct PacketProcessor {
    catalog: &'static PacketCatalog,
    reassembler: Reassembler,
    snapshot: Arc<TelemetrySnapshot>,
    stats: ProcessorStats,
    reported_versions: HashSet<(u8, u8)>,
}

impl PacketProcessor {
    pub fn new(snapshot: Arc<TelemetrySnapshot>, reassembly: ReassemblyConfig) -> Self {
        Self::with_catalog(PacketCatalog::standard(), snapshot, reassembly)
    }

    pub fn with_catalog(
        catalog: &'static PacketCatalog,
        snapshot: Arc<TelemetrySnapshot>,
        reassembly: ReassemblyConfig,
    ) -> Self {
        Self {
            catalog,
            reassembler: Reassembler::new(reassembly),
            snapshot,
            stats: ProcessorStats::default(),
            reported_versions: HashSet::new(),
        }
    }

    pub fn snapshot(&self) -> &Arc<TelemetrySnapshot> {
        &self.snapshot
    }

    pub fn stats(&self) -> ProcessorStats {
        ProcessorStats { reassembly: self.reassembler.stats(), ..self.stats }
    }

    /// Process a datagram received now.
    pub fn ingest(&mut self, datagram: &[u8]) -> Result<IngestOutcome> {
        self.ingest_at(datagram, Instant::now())
    }

    /// Process a datagram received at `now`.
    pub fn ingest_at(&mut self, datagram: &[u8], now: Instant) -> Result<IngestOutcome> {
        self.stats.datagrams += 1;
        match self.process(datagram, now) {
            Ok(outcome) => {
                match outcome {
                    IngestOutcome::Updated(_) => self.stats.updates += 1,
                    IngestOutcome::Pending => self.stats.pending += 1,
                    IngestOutcome::Discarded => self.stats.discarded += 1,
                }
                Ok(outcome)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    fn process(&mut self, datagram: &[u8], now: Instant) -> Result<IngestOutcome> {
        let header = parse_header(datagram)?;

        // Reject unknown pairs before buffering any of their parts
        self.catalog.resolve(header.packet_type, header.packet_version)?;

        let packet = match self.reassembler.push_at(datagram, now)? {
            Reassembly::Complete { packet, .. } => packet,
            Reassembly::Pending => return Ok(IngestOutcome::Pending),
            Reassembly::Stale => return Ok(IngestOutcome::Discarded),
        };

        let descriptor =
            self.catalog.resolve_for_length(header.packet_type, header.packet_version, packet.len())?;
        descriptor.check_length(packet.len())?;

        let category = descriptor.category;
        trace!(
            %category,
            packet_number = header.packet_number,
            cpn = header.category_packet_number,
            "Packet accepted"
        );
        self.snapshot.update(category, &*packet, descriptor);
        Ok(IngestOutcome::Updated(category))
    }

    fn record_error(&mut self, e: &TelemetryError) {
        match e {
            TelemetryError::TooShort { .. } => self.stats.too_short += 1,
            TelemetryError::UnknownType { .. } => self.stats.unknown_type += 1,
            TelemetryError::VersionMismatch { .. } => self.stats.version_mismatch += 1,
            TelemetryError::LengthMismatch { .. } => self.stats.length_mismatch += 1,
            TelemetryError::InvalidPartIndex { .. } => self.stats.invalid_part_index += 1,
            _ => {}
        }

        if let TelemetryError::VersionMismatch { packet_type, found, .. } = e {
            if self.reported_versions.insert((*packet_type, *found)) {
                error!("{}; decoding tables may be outdated", e);
            } else {
                trace!("{}", e);
            }
            return;
        }

        match e.severity() {
            Level::ERROR => error!("Skipping datagram: {}", e),
            Level::WARN => warn!("Skipping datagram: {}", e),
            Level::DEBUG => debug!("Skipping datagram: {}", e),
            _ => trace!("Skipping datagram: {}", e),
        }
    }
}
