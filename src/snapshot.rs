//! Latest complete packet per category.
//!
//! The snapshot stores raw buffers, never decoded records: every read decodes
//! the stored bytes again. The layouts are small and fixed, so decoding is
//! cheap, and a reader can never see a decoded value that is older than the
//! buffer it came from.
//!
//! Each category slot is a `tokio::sync::watch` channel holding an
//! `Arc<RawPacket>`. An update builds the packet completely and then swaps
//! the pointer, so readers observe either the previous packet or the new one,
//! never a mix. Readers on any thread share the snapshot through an `Arc`.
//!
//! ```rust
//! use sms_udp::{PacketCategory, TelemetryError, TelemetrySnapshot};
//!
//! let snapshot = TelemetrySnapshot::new();
//! assert!(matches!(
//!     snapshot.game_state(),
//!     Err(TelemetryError::Unavailable { category: PacketCategory::GameState })
//! ));
//! ```

use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

use crate::dynamic_record::DynamicRecord;
use crate::records::{
    self, CarPhysics, CategoryRecord, GameState, ParticipantVehicleNames, Participants,
    RaceDefinition, Record, TimeStats, Timings, VehicleClassNames,
};
use crate::types::{Header, LayoutDescriptor, PacketCategory, parse_header};
use crate::{Result, TelemetryError};

/// One complete packet buffer and the layout it was resolved to.
#[derive(Debug, Clone)]
pub struct RawPacket {
    pub data: Arc<[u8]>,
    pub descriptor: &'static LayoutDescriptor,
}

impl RawPacket {
    pub fn new(data: impl Into<Arc<[u8]>>, descriptor: &'static LayoutDescriptor) -> Self {
        Self { data: data.into(), descriptor }
    }

    pub fn category(&self) -> PacketCategory {
        self.descriptor.category
    }

    pub fn header(&self) -> Result<Header> {
        parse_header(&self.data)
    }

    /// Decode into the record for this packet's category.
    pub fn decode(&self) -> Result<Record> {
        records::decode(&self.data, self.descriptor)
    }

    /// Decode into a specific record type; the buffer must fit its layout.
    pub fn decode_as<R: CategoryRecord>(&self) -> Result<R> {
        R::decode_bytes(&self.data)
    }

    /// By-name view over this packet.
    pub fn dynamic(&self) -> Result<DynamicRecord> {
        DynamicRecord::new(Arc::clone(&self.data), self.descriptor)
    }
}

type Slot = watch::Sender<Option<Arc<RawPacket>>>;

/// Process-wide holder of the latest packet per category.
#[derive(Debug)]
pub struct TelemetrySnapshot {
    slots: [Slot; PacketCategory::COUNT],
}

impl TelemetrySnapshot {
    pub fn new() -> Self {
        Self { slots: std::array::from_fn(|_| watch::channel(None).0) }
    }

    fn slot(&self, category: PacketCategory) -> &Slot {
        &self.slots[category.index()]
    }

    /// Replace the stored packet for a category.
    ///
    /// Never fails; validation happens before a packet reaches the snapshot.
    pub fn update(
        &self,
        category: PacketCategory,
        raw: impl Into<Arc<[u8]>>,
        descriptor: &'static LayoutDescriptor,
    ) {
        let packet = Arc::new(RawPacket::new(raw, descriptor));
        trace!(%category, len = packet.data.len(), "Snapshot updated");
        self.slot(category).send_replace(Some(packet));
    }

    /// Latest raw packet for a category, if any arrived.
    pub fn raw(&self, category: PacketCategory) -> Option<Arc<RawPacket>> {
        self.slot(category).borrow().clone()
    }

    pub fn is_available(&self, category: PacketCategory) -> bool {
        self.slot(category).borrow().is_some()
    }

    fn require(&self, category: PacketCategory) -> Result<Arc<RawPacket>> {
        self.raw(category).ok_or(TelemetryError::Unavailable { category })
    }

    /// Decode the latest packet of a category.
    pub fn read(&self, category: PacketCategory) -> Result<Record> {
        self.require(category)?.decode()
    }

    /// Decode the latest packet of a category as its typed record.
    pub fn get<R: CategoryRecord>(&self) -> Result<R> {
        self.require(R::CATEGORY)?.decode_as()
    }

    /// By-name view over the latest packet of a category.
    pub fn dynamic(&self, category: PacketCategory) -> Result<DynamicRecord> {
        self.require(category)?.dynamic()
    }

    /// Header bookkeeping fields of the latest packet of a category.
    pub fn bookkeeping(&self, category: PacketCategory) -> Result<Header> {
        self.require(category)?.header()
    }

    /// Watch the slot of a category; the receiver sees every later update.
    pub fn subscribe(&self, category: PacketCategory) -> watch::Receiver<Option<Arc<RawPacket>>> {
        self.slot(category).subscribe()
    }

    /// Categories that have received at least one packet.
    pub fn available(&self) -> Vec<PacketCategory> {
        PacketCategory::ALL.into_iter().filter(|c| self.is_available(*c)).collect()
    }

    pub fn car_physics(&self) -> Result<CarPhysics> {
        self.get()
    }

    pub fn race_definition(&self) -> Result<RaceDefinition> {
        self.get()
    }

    pub fn participants(&self) -> Result<Participants> {
        self.get()
    }

    pub fn timings(&self) -> Result<Timings> {
        self.get()
    }

    pub fn game_state(&self) -> Result<GameState> {
        self.get()
    }

    pub fn time_stats(&self) -> Result<TimeStats> {
        self.get()
    }

    pub fn participant_vehicle_names(&self) -> Result<ParticipantVehicleNames> {
        self.get()
    }

    pub fn vehicle_class_names(&self) -> Result<VehicleClassNames> {
        self.get()
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::new()
    }
}
