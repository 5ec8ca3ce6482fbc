//! Packet catalog: (packet_type, packet_version) → layout descriptor.
//!
//! The catalog is a fixed table built once per process and read-only after
//! initialization, so lookups need no locking. Dispatch is an exact O(1)
//! match on both header fields:
//!
//! - a known pair resolves to its [`LayoutDescriptor`]
//! - a known type with an unexpected version is [`TelemetryError::VersionMismatch`],
//!   which means the game speaks a newer protocol than these tables
//! - an unknown type is [`TelemetryError::UnknownType`], which is garbage or a
//!   category the game defines but does not send
//!
//! The game multiplexes the participant vehicle names and vehicle class names
//! layouts onto the same (type, version) pair; they differ only in length.
//! [`PacketCatalog::resolve`] returns the primary layout for a pair and
//! [`PacketCatalog::resolve_for_length`] picks the sibling matching a buffer.
//!
//! ```rust
//! use sms_udp::{PacketCatalog, PacketCategory, TelemetryError};
//!
//! let catalog = PacketCatalog::standard();
//! let descriptor = catalog.resolve(4, 2).unwrap();
//! assert_eq!(descriptor.category, PacketCategory::GameState);
//! assert_eq!(descriptor.length, 22);
//!
//! assert!(matches!(catalog.resolve(4, 9), Err(TelemetryError::VersionMismatch { .. })));
//! assert!(matches!(catalog.resolve(200, 1), Err(TelemetryError::UnknownType { .. })));
//! ```

pub mod tables;

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{LayoutDescriptor, PacketCategory};
use crate::{Result, TelemetryError};

static STANDARD: LazyLock<PacketCatalog> = LazyLock::new(|| {
    PacketCatalog::from_layouts(&tables::ALL_LAYOUTS)
        .expect("built-in layout table is consistent")
});

/// Lookup table from header fields to layout descriptors.
#[derive(Debug, Clone)]
pub struct PacketCatalog {
    /// Descriptors per (type, version), primary first
    entries: HashMap<(u8, u8), Vec<&'static LayoutDescriptor>>,
    /// Supported versions per packet type, for version mismatch reports
    versions: HashMap<u8, BTreeSet<u8>>,
    /// Descriptor per category
    by_category: HashMap<PacketCategory, &'static LayoutDescriptor>,
}

impl PacketCatalog {
    /// The process-wide catalog of every supported layout.
    pub fn standard() -> &'static PacketCatalog {
        &STANDARD
    }

    /// Build a catalog from descriptors, validating each field plan.
    ///
    /// Descriptors sharing a (type, version) pair must differ in length, and
    /// each category may appear only once.
    pub fn from_layouts(layouts: &[&'static LayoutDescriptor]) -> Result<Self> {
        let mut entries: HashMap<(u8, u8), Vec<&'static LayoutDescriptor>> = HashMap::new();
        let mut versions: HashMap<u8, BTreeSet<u8>> = HashMap::new();
        let mut by_category = HashMap::new();

        for &descriptor in layouts {
            descriptor.validate()?;

            let key = (descriptor.packet_type, descriptor.packet_version);
            let siblings = entries.entry(key).or_default();
            if siblings.iter().any(|other| other.length == descriptor.length) {
                return Err(TelemetryError::config(format!(
                    "Layouts for type {} version {} are indistinguishable ({} bytes)",
                    key.0, key.1, descriptor.length
                )));
            }
            siblings.push(descriptor);

            if by_category.insert(descriptor.category, descriptor).is_some() {
                return Err(TelemetryError::config(format!(
                    "Category {} is cataloged twice",
                    descriptor.category
                )));
            }

            versions.entry(descriptor.packet_type).or_default().insert(descriptor.packet_version);
        }

        debug!(layouts = layouts.len(), "Built packet catalog");
        Ok(Self { entries, versions, by_category })
    }

    /// Resolve the primary descriptor for a (type, version) pair.
    pub fn resolve(&self, packet_type: u8, packet_version: u8) -> Result<&'static LayoutDescriptor> {
        match self.entries.get(&(packet_type, packet_version)).and_then(|list| list.first().copied()) {
            Some(descriptor) => Ok(descriptor),
            None => Err(self.miss(packet_type, packet_version)),
        }
    }

    /// Resolve the descriptor for a (type, version) pair whose length matches `len`.
    ///
    /// Falls back to the primary descriptor when no sibling matches, so the
    /// caller's length check reports the mismatch against it.
    pub fn resolve_for_length(
        &self,
        packet_type: u8,
        packet_version: u8,
        len: usize,
    ) -> Result<&'static LayoutDescriptor> {
        let list = self
            .entries
            .get(&(packet_type, packet_version))
            .filter(|list| !list.is_empty())
            .ok_or_else(|| self.miss(packet_type, packet_version))?;

        Ok(list.iter().find(|d| d.length == len).copied().unwrap_or(list[0]))
    }

    /// Descriptor for a category.
    pub fn descriptor(&self, category: PacketCategory) -> Option<&'static LayoutDescriptor> {
        self.by_category.get(&category).copied()
    }

    /// Supported versions for a packet type, empty if the type is unknown.
    pub fn supported_versions(&self, packet_type: u8) -> Vec<u8> {
        self.versions.get(&packet_type).map(|set| set.iter().copied().collect()).unwrap_or_default()
    }

    /// Every cataloged descriptor.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static LayoutDescriptor> + '_ {
        self.entries.values().flatten().copied()
    }

    fn miss(&self, packet_type: u8, packet_version: u8) -> TelemetryError {
        match self.versions.get(&packet_type) {
            Some(supported) => TelemetryError::VersionMismatch {
                packet_type,
                supported: supported.iter().copied().collect(),
                found: packet_version,
            },
            None => TelemetryError::UnknownType { packet_type },
        }
    }
}
