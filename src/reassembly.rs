//! Multi-part packet reassembly.
//!
//! Large categories are split across several datagrams that share a packet
//! type and category packet number. Parts are collected per packet type and
//! emitted as one buffer (part 0's header followed by every part body in
//! index order) once all of them have arrived.
//!
//! Policy:
//! - single-part packets pass straight through without copying
//! - a strictly newer category packet number for the same type supersedes
//!   the buffer being collected, which is discarded and never emitted
//! - packets and parts older than the newest number seen for their type, or
//!   parts belonging to a packet already delivered, are stale and dropped;
//!   this memory lasts as long as `idle_timeout`, so a game restart that
//!   resets the counters recovers on its own
//! - a buffer with no new part for `idle_timeout` expires
//! - at most `max_in_flight` buffers are held; the least recently touched is
//!   evicted to make room
//! - a duplicate part overwrites the earlier copy
//!
//! Expiry is checked on every push, so no timer task is needed.

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::types::{HEADER_SIZE, Header, sequence_after, split_datagram};
use crate::{Result, TelemetryError};

/// Reassembly limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassemblyConfig {
    /// Idle time after which an incomplete buffer is discarded
    pub idle_timeout: Duration,
    /// Maximum number of buffers collected at once
    pub max_in_flight: usize,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self { idle_timeout: Duration::from_millis(250), max_in_flight: 16 }
    }
}

/// Result of pushing one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassembly<'a> {
    /// A complete logical packet, header included
    Complete { header: Header, packet: Cow<'a, [u8]> },
    /// Part stored, more parts outstanding
    Pending,
    /// Part belongs to a packet that is already obsolete or delivered
    Stale,
}

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReassemblyStats {
    pub completed: u64,
    pub superseded: u64,
    pub expired: u64,
    pub evicted: u64,
    pub duplicates: u64,
    pub stale: u64,
}

#[derive(Debug)]
struct PartialPacket {
    category_packet_number: u32,
    header: [u8; HEADER_SIZE],
    bodies: Vec<Option<Vec<u8>>>,
    received: usize,
    last_seen: Instant,
}

impl PartialPacket {
    fn new(header: &Header, now: Instant) -> Self {
        Self {
            category_packet_number: header.category_packet_number,
            header: [0; HEADER_SIZE],
            bodies: vec![None; usize::from(header.partial_packet_number)],
            received: 0,
            last_seen: now,
        }
    }

    /// Store a part; returns true when it replaced an earlier copy.
    fn insert(&mut self, header: &Header, datagram: &[u8], now: Instant) -> bool {
        let index = usize::from(header.partial_packet_index);
        if index == 0 {
            self.header.copy_from_slice(&datagram[..HEADER_SIZE]);
        }
        let duplicate = self.bodies[index].replace(datagram[HEADER_SIZE..].to_vec()).is_some();
        if !duplicate {
            self.received += 1;
        }
        self.last_seen = now;
        duplicate
    }

    fn is_complete(&self) -> bool {
        self.received == self.bodies.len()
    }

    fn assemble(self) -> Vec<u8> {
        let body_len: usize = self.bodies.iter().flatten().map(Vec::len).sum();
        let mut packet = Vec::with_capacity(HEADER_SIZE + body_len);
        packet.extend_from_slice(&self.header);
        for body in self.bodies.into_iter().flatten() {
            packet.extend_from_slice(&body);
        }
        packet
    }
}

/// Newest category packet number seen for a packet type.
#[derive(Debug, Clone, Copy)]
struct Newest {
    cpn: u32,
    at: Instant,
    delivered: bool,
}

/// Collects multi-part packets into complete buffers.
///
/// Buffers are keyed by (packet type, category packet number); since a newer
/// number supersedes an older one, at most one number per type is collected.
#[derive(Debug)]
pub struct Reassembler {
    config: ReassemblyConfig,
    in_flight: HashMap<u8, PartialPacket>,
    newest: HashMap<u8, Newest>,
    stats: ReassemblyStats,
}

impl Reassembler {
    pub fn new(config: ReassemblyConfig) -> Self {
        Self { config, in_flight: HashMap::new(), newest: HashMap::new(), stats: Default::default() }
    }

    pub fn config(&self) -> &ReassemblyConfig {
        &self.config
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    /// Number of buffers currently being collected.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Push a datagram received now.
    pub fn push<'a>(&mut self, datagram: &'a [u8]) -> Result<Reassembly<'a>> {
        self.push_at(datagram, Instant::now())
    }

    /// Push a datagram received at `now`.
    pub fn push_at<'a>(&mut self, datagram: &'a [u8], now: Instant) -> Result<Reassembly<'a>> {
        let (header, _) = split_datagram(datagram)?;
        if !header.has_valid_part_index() {
            return Err(TelemetryError::InvalidPartIndex {
                packet_type: header.packet_type,
                index: header.partial_packet_index,
                total: header.partial_packet_number,
            });
        }

        self.expire(now);
        let packet_type = header.packet_type;
        let cpn = header.category_packet_number;

        let newest = self
            .newest
            .get(&packet_type)
            .filter(|n| now.saturating_duration_since(n.at) < self.config.idle_timeout)
            .copied();
        let older = newest.is_some_and(|n| sequence_after(n.cpn, cpn));

        if header.is_single_part() {
            if older {
                trace!(packet_type, cpn, "Stale single-part packet dropped");
                self.stats.stale += 1;
                return Ok(Reassembly::Stale);
            }
            self.note_newest(packet_type, cpn, now);
            if self
                .in_flight
                .get(&packet_type)
                .is_some_and(|p| sequence_after(cpn, p.category_packet_number))
            {
                self.supersede(packet_type, cpn);
            }
            return Ok(Reassembly::Complete { header, packet: Cow::Borrowed(datagram) });
        }

        if older || newest.is_some_and(|n| n.cpn == cpn && n.delivered) {
            trace!(packet_type, cpn, part = header.partial_packet_index, "Stale part dropped");
            self.stats.stale += 1;
            return Ok(Reassembly::Stale);
        }
        self.note_newest(packet_type, cpn, now);

        if let Some(partial) = self.in_flight.get(&packet_type) {
            if sequence_after(cpn, partial.category_packet_number) {
                self.supersede(packet_type, cpn);
            } else if partial.bodies.len() != usize::from(header.partial_packet_number) {
                debug!(packet_type, cpn, "Part count changed, restarting buffer");
                self.in_flight.remove(&packet_type);
            }
        }

        if !self.in_flight.contains_key(&packet_type) {
            self.make_room();
        }
        let partial =
            self.in_flight.entry(packet_type).or_insert_with(|| PartialPacket::new(&header, now));
        if partial.insert(&header, datagram, now) {
            self.stats.duplicates += 1;
        }
        trace!(
            packet_type,
            cpn,
            part = header.partial_packet_index,
            received = partial.received,
            total = partial.bodies.len(),
            "Stored part"
        );

        if !partial.is_complete() {
            return Ok(Reassembly::Pending);
        }

        let Some(partial) = self.in_flight.remove(&packet_type) else {
            return Ok(Reassembly::Pending);
        };
        let packet = partial.assemble();
        let (header, _) = split_datagram(&packet)?;
        if let Some(newest) = self.newest.get_mut(&packet_type) {
            newest.delivered = newest.cpn == cpn;
        }
        self.stats.completed += 1;
        debug!(packet_type, cpn, len = packet.len(), "Reassembled packet");
        Ok(Reassembly::Complete { header, packet: Cow::Owned(packet) })
    }

    /// Discard buffers idle for longer than the timeout; returns how many.
    pub fn expire(&mut self, now: Instant) -> usize {
        let timeout = self.config.idle_timeout;
        let before = self.in_flight.len();
        self.in_flight.retain(|packet_type, partial| {
            let idle = now.saturating_duration_since(partial.last_seen);
            let keep = idle < timeout;
            if !keep {
                debug!(
                    packet_type = *packet_type,
                    cpn = partial.category_packet_number,
                    received = partial.received,
                    total = partial.bodies.len(),
                    "Reassembly expired"
                );
            }
            keep
        });
        let expired = before - self.in_flight.len();
        self.stats.expired += expired as u64;
        expired
    }

    /// Drop every buffer being collected.
    pub fn clear(&mut self) {
        self.in_flight.clear();
        self.newest.clear();
    }

    fn note_newest(&mut self, packet_type: u8, cpn: u32, now: Instant) {
        let newest = self.newest.entry(packet_type).or_insert(Newest { cpn, at: now, delivered: false });
        if newest.cpn != cpn {
            *newest = Newest { cpn, at: now, delivered: false };
        }
        newest.at = now;
    }

    fn supersede(&mut self, packet_type: u8, cpn: u32) {
        if let Some(old) = self.in_flight.remove(&packet_type) {
            debug!(
                packet_type,
                old = old.category_packet_number,
                new = cpn,
                received = old.received,
                "Reassembly superseded"
            );
            self.stats.superseded += 1;
        }
    }

    fn make_room(&mut self) {
        while self.in_flight.len() >= self.config.max_in_flight.max(1) {
            let oldest = self
                .in_flight
                .iter()
                .min_by_key(|(_, partial)| partial.last_seen)
                .map(|(packet_type, _)| *packet_type);
            let Some(packet_type) = oldest else { break };
            debug!(packet_type, "Evicting oldest reassembly buffer");
            self.in_flight.remove(&packet_type);
            self.stats.evicted += 1;
        }
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(ReassemblyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::DatagramBuilder;

    fn part(cpn: u32, index: u8, total: u8, body: &[u8]) -> Vec<u8> {
        DatagramBuilder::new(3, 2).category_packet_number(cpn).part(index, total).body(body).build()
    }

    fn complete(result: Reassembly<'_>) -> Vec<u8> {
        match result {
            Reassembly::Complete { packet, .. } => packet.into_owned(),
            other => panic!("Expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn single_part_passes_through_borrowed() {
        let mut reassembler = Reassembler::default();
        let datagram = part(1, 0, 1, b"body");
        match reassembler.push(&datagram).unwrap() {
            Reassembly::Complete { header, packet: Cow::Borrowed(bytes) } => {
                assert_eq!(bytes.as_ptr(), datagram.as_ptr());
                assert_eq!(header.category_packet_number, 1);
            }
            other => panic!("Expected borrowed passthrough, got {:?}", other),
        }
        assert_eq!(reassembler.in_flight(), 0);
    }

    #[test]
    fn parts_concatenate_in_index_order() {
        let mut reassembler = Reassembler::default();
        let parts = [part(7, 0, 3, b"aa"), part(7, 1, 3, b"bbb"), part(7, 2, 3, b"c")];

        assert_eq!(reassembler.push(&parts[2]).unwrap(), Reassembly::Pending);
        assert_eq!(reassembler.push(&parts[0]).unwrap(), Reassembly::Pending);
        let packet = complete(reassembler.push(&parts[1]).unwrap());

        assert_eq!(&packet[..HEADER_SIZE], &parts[0][..HEADER_SIZE]);
        assert_eq!(&packet[HEADER_SIZE..], b"aabbbc");
        assert_eq!(reassembler.stats().completed, 1);
        assert_eq!(reassembler.in_flight(), 0);
    }

    #[test]
    fn newer_packet_supersedes_partial_buffer() {
        let mut reassembler = Reassembler::default();
        reassembler.push(&part(10, 0, 3, b"old")).unwrap();

        let fresh = part(11, 0, 1, b"new");
        let packet = complete(reassembler.push(&fresh).unwrap());
        assert_eq!(packet, fresh);
        assert_eq!(reassembler.in_flight(), 0);
        assert_eq!(reassembler.stats().superseded, 1);

        // Late parts of the superseded packet never complete it
        assert_eq!(reassembler.push(&part(10, 1, 3, b"x")).unwrap(), Reassembly::Stale);
        assert_eq!(reassembler.push(&part(12, 0, 2, b"y")).unwrap(), Reassembly::Pending);
        assert_eq!(reassembler.push(&part(10, 2, 3, b"z")).unwrap(), Reassembly::Stale);
        assert_eq!(reassembler.stats().completed, 0);
    }

    #[test]
    fn older_single_part_is_stale_and_does_not_disturb_collection() {
        let mut reassembler = Reassembler::default();
        reassembler.push(&part(20, 0, 2, b"a")).unwrap();
        assert_eq!(reassembler.push(&part(19, 0, 1, b"old")).unwrap(), Reassembly::Stale);
        let packet = complete(reassembler.push(&part(20, 1, 2, b"b")).unwrap());
        assert_eq!(&packet[HEADER_SIZE..], b"ab");
        assert_eq!(reassembler.stats().stale, 1);
    }

    #[test]
    fn reordered_single_parts_keep_the_newest() {
        let mut reassembler = Reassembler::default();
        complete(reassembler.push(&part(6, 0, 1, b"six")).unwrap());
        assert_eq!(reassembler.push(&part(5, 0, 1, b"five")).unwrap(), Reassembly::Stale);
        // Same number again is not older
        complete(reassembler.push(&part(6, 0, 1, b"six")).unwrap());
        complete(reassembler.push(&part(7, 0, 1, b"seven")).unwrap());
    }

    #[test]
    fn older_single_part_passes_once_memory_lapses() {
        let config = ReassemblyConfig { idle_timeout: Duration::from_millis(50), ..Default::default() };
        let mut reassembler = Reassembler::new(config);
        let start = Instant::now();
        complete(reassembler.push_at(&part(900, 0, 1, b"before"), start).unwrap());

        let restarted = part(1, 0, 1, b"after");
        let later = start + Duration::from_millis(100);
        assert_eq!(complete(reassembler.push_at(&restarted, later).unwrap()), restarted);
    }

    #[test]
    fn duplicates_overwrite() {
        let mut reassembler = Reassembler::default();
        reassembler.push(&part(5, 0, 2, b"first")).unwrap();
        reassembler.push(&part(5, 0, 2, b"again")).unwrap();
        let packet = complete(reassembler.push(&part(5, 1, 2, b"!")).unwrap());
        assert_eq!(&packet[HEADER_SIZE..], b"again!");
        assert_eq!(reassembler.stats().duplicates, 1);

        // A repeat of a delivered part is not collected again
        assert_eq!(reassembler.push(&part(5, 1, 2, b"!")).unwrap(), Reassembly::Stale);
        assert_eq!(reassembler.in_flight(), 0);
    }

    #[test]
    fn idle_buffers_expire() {
        let mut reassembler = Reassembler::default();
        let start = Instant::now();
        reassembler.push_at(&part(1, 0, 2, b"a"), start).unwrap();

        let later = start + Duration::from_millis(300);
        assert_eq!(reassembler.expire(later), 1);
        assert_eq!(reassembler.stats().expired, 1);

        // The missing half now starts a fresh buffer instead of completing
        assert_eq!(reassembler.push_at(&part(1, 1, 2, b"b"), later).unwrap(), Reassembly::Pending);
    }

    #[test]
    fn expiry_runs_on_push() {
        let mut reassembler = Reassembler::default();
        let start = Instant::now();
        reassembler.push_at(&part(1, 0, 2, b"a"), start).unwrap();
        let other = DatagramBuilder::new(7, 2).part(0, 1).build();
        reassembler.push_at(&other, start + Duration::from_secs(1)).unwrap();
        assert_eq!(reassembler.in_flight(), 0);
    }

    #[test]
    fn bounded_in_flight_evicts_oldest() {
        let config = ReassemblyConfig { max_in_flight: 2, ..Default::default() };
        let mut reassembler = Reassembler::new(config);
        let start = Instant::now();

        for (offset, packet_type) in [1u8, 2, 3].into_iter().enumerate() {
            let datagram = DatagramBuilder::new(packet_type, 2).part(0, 2).build();
            let now = start + Duration::from_millis(offset as u64);
            reassembler.push_at(&datagram, now).unwrap();
        }
        assert_eq!(reassembler.in_flight(), 2);
        assert_eq!(reassembler.stats().evicted, 1);

        // Type 1 was evicted, so its second part starts over
        let second = DatagramBuilder::new(1, 2).part(1, 2).build();
        assert_eq!(reassembler.push_at(&second, start).unwrap(), Reassembly::Pending);
    }

    #[test]
    fn invalid_part_index_is_rejected() {
        let mut reassembler = Reassembler::default();
        for (index, total) in [(3, 3), (0, 0), (5, 1)] {
            match reassembler.push(&part(1, index, total, b"x")) {
                Err(TelemetryError::InvalidPartIndex { index: i, total: t, .. }) => {
                    assert_eq!((i, t), (index, total));
                }
                other => panic!("Expected InvalidPartIndex, got {:?}", other),
            }
        }
        assert_eq!(reassembler.in_flight(), 0);
    }

    #[test]
    fn part_count_change_restarts_buffer() {
        let mut reassembler = Reassembler::default();
        reassembler.push(&part(4, 0, 3, b"a")).unwrap();
        reassembler.push(&part(4, 1, 2, b"b")).unwrap();
        let packet = complete(reassembler.push(&part(4, 0, 2, b"a")).unwrap());
        assert_eq!(&packet[HEADER_SIZE..], b"ab");
    }

    #[test]
    fn short_datagram_is_rejected() {
        let mut reassembler = Reassembler::default();
        assert!(matches!(reassembler.push(&[0u8; 5]), Err(TelemetryError::TooShort { .. })));
    }
}
