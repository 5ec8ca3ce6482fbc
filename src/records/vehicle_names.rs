//! Vehicle and vehicle class names.
//!
//! Both layouts share one (type, version) pair on the wire and are told apart
//! by length, see [`PacketCatalog::resolve_for_length`].
//!
//! [`PacketCatalog::resolve_for_length`]: crate::PacketCatalog::resolve_for_length

use serde::Serialize;

use super::CategoryRecord;
use crate::catalog::tables::{
    self, CLASS_NAME_LENGTH_MAX, CLASSES_SUPPORTED_PER_PACKET, VEHICLE_NAME_LENGTH_MAX,
    VEHICLES_PER_PACKET,
};
use crate::types::{
    FixedText, Header, LayoutDescriptor, PacketCategory, WireFormat, WireReader, decode_vec,
};
use crate::Result;

wire_record! {
    /// One vehicle entry.
    pub struct VehicleInfo {
        pub index: u16,
        pub class: u32,
        pub name: FixedText<VEHICLE_NAME_LENGTH_MAX>,
    }
}

wire_record! {
    /// Participant vehicle names packet.
    pub struct ParticipantVehicleNames {
        pub header: Header,
        pub vehicles: [VehicleInfo; VEHICLES_PER_PACKET],
    }
}

wire_record! {
    /// One vehicle class entry.
    pub struct ClassInfo {
        pub class_index: u32,
        pub name: FixedText<CLASS_NAME_LENGTH_MAX>,
    }
}

/// Vehicle class names packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleClassNames {
    pub header: Header,
    /// Always [`CLASSES_SUPPORTED_PER_PACKET`] entries
    pub classes: Vec<ClassInfo>,
}

impl VehicleClassNames {
    /// Name of a class by its class index.
    pub fn class_name(&self, class_index: u32) -> Option<&FixedText<CLASS_NAME_LENGTH_MAX>> {
        self.classes.iter().find(|c| c.class_index == class_index).map(|c| &c.name)
    }
}

impl WireFormat for VehicleClassNames {
    const SIZE: usize = Header::SIZE + ClassInfo::SIZE * CLASSES_SUPPORTED_PER_PACKET;

    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self { header: reader.read()?, classes: decode_vec(reader, CLASSES_SUPPORTED_PER_PACKET)? })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        for class in &self.classes {
            class.encode(out);
        }
    }
}

impl CategoryRecord for ParticipantVehicleNames {
    const CATEGORY: PacketCategory = PacketCategory::ParticipantVehicleNames;

    fn layout() -> &'static LayoutDescriptor {
        &tables::PARTICIPANT_VEHICLE_NAMES
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

impl CategoryRecord for VehicleClassNames {
    const CATEGORY: PacketCategory = PacketCategory::VehicleClassNames;

    fn layout() -> &'static LayoutDescriptor {
        &tables::VEHICLE_CLASS_NAMES
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;

    #[test]
    fn class_lookup_by_index() {
        let mut packet = vec![0u8; tables::VEHICLE_CLASS_NAMES.length];
        let classes = tables::VEHICLE_CLASS_NAMES.field("classes").unwrap();
        let entry = classes.element_offset(59);
        packet[entry..entry + 4].copy_from_slice(&42u32.to_le_bytes());
        packet[entry + 4..entry + 8].copy_from_slice(b"GT3\0");

        let names = VehicleClassNames::decode_bytes(&packet).unwrap();
        assert_eq!(names.classes.len(), CLASSES_SUPPORTED_PER_PACKET);
        assert_eq!(names.class_name(42).unwrap().as_str().unwrap(), "GT3");
        assert!(names.class_name(7).is_none());
    }

    #[test]
    fn vehicle_entries_decode() {
        let mut packet = vec![0u8; tables::PARTICIPANT_VEHICLE_NAMES.length];
        let vehicles = tables::PARTICIPANT_VEHICLE_NAMES.field("vehicles").unwrap();
        let entry = vehicles.element_offset(15);
        packet[entry..entry + 2].copy_from_slice(&300u16.to_le_bytes());
        packet[entry + 2..entry + 6].copy_from_slice(&42u32.to_le_bytes());
        packet[entry + 6..entry + 13].copy_from_slice(b"Formula");

        let names = ParticipantVehicleNames::decode_bytes(&packet).unwrap();
        let last = &names.vehicles[15];
        assert_eq!((last.index, last.class), (300, 42));
        assert_eq!(last.name.as_str().unwrap(), "Formula");
    }

    #[test]
    fn sibling_lengths_are_not_interchangeable() {
        let packet = vec![0u8; tables::PARTICIPANT_VEHICLE_NAMES.length];
        assert!(matches!(
            VehicleClassNames::decode_bytes(&packet),
            Err(TelemetryError::LengthMismatch { expected: 1452, actual: 1132, .. })
        ));
    }
}
