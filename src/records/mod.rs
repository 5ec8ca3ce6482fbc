//! Typed records, one per packet category.
//!
//! Every record starts with the common [`Header`] followed by its category
//! body, field for field in wire order. Records implement [`WireFormat`], so
//! a decoded record re-encodes to exactly the bytes it was decoded from.
//!
//! Decoding is all-or-nothing on length: a buffer whose size differs from the
//! layout's fixed length is rejected with [`TelemetryError::LengthMismatch`]
//! before any field is read. Text fields are kept as raw [`FixedText`] bytes
//! and decoded per field, so invalid UTF-8 never fails a record.
//!
//! [`FixedText`]: crate::types::FixedText

use serde::Serialize;

use crate::types::{Header, LayoutDescriptor, PacketCategory, WireFormat, WireReader};
use crate::{Result, TelemetryError};

/// Declare a packed record struct and its field-by-field wire codec.
///
/// Fields are decoded and encoded in declaration order and `SIZE` is the sum
/// of the field sizes.
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl $crate::types::WireFormat for $name {
            const SIZE: usize = 0 $( + <$ty as $crate::types::WireFormat>::SIZE )*;

            fn decode(reader: &mut $crate::types::WireReader<'_>) -> $crate::Result<Self> {
                Ok(Self { $( $field: reader.read()?, )* })
            }

            fn encode(&self, out: &mut Vec<u8>) {
                $( $crate::types::WireFormat::encode(&self.$field, out); )*
            }
        }
    };
}

mod car_physics;
mod game_state;
mod participants;
mod race;
mod time_stats;
mod timings;
mod vehicle_names;

pub use car_physics::{CarPhysics, REVERSE_GEAR};
pub use game_state::GameState;
pub use participants::Participants;
pub use race::RaceDefinition;
pub use time_stats::{ParticipantStatsInfo, TimeStats};
pub use timings::{ParticipantInfo, Timings};
pub use vehicle_names::{ClassInfo, ParticipantVehicleNames, VehicleClassNames, VehicleInfo};

/// A typed record bound to one packet category.
pub trait CategoryRecord: WireFormat + Serialize + Send + Sync + 'static {
    /// Category this record decodes.
    const CATEGORY: PacketCategory;

    /// Layout descriptor for this record.
    fn layout() -> &'static LayoutDescriptor;

    /// Common header the record was received with.
    fn header(&self) -> &Header;

    /// Decode a complete packet buffer, header included.
    fn decode_bytes(raw: &[u8]) -> Result<Self> {
        Self::layout().check_length(raw.len())?;
        WireReader::new(raw).read()
    }
}

/// Any decoded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", content = "record")]
pub enum Record {
    CarPhysics(Box<CarPhysics>),
    RaceDefinition(Box<RaceDefinition>),
    Participants(Box<Participants>),
    Timings(Box<Timings>),
    GameState(GameState),
    TimeStats(Box<TimeStats>),
    ParticipantVehicleNames(Box<ParticipantVehicleNames>),
    VehicleClassNames(Box<VehicleClassNames>),
}

impl Record {
    pub fn category(&self) -> PacketCategory {
        match self {
            Record::CarPhysics(_) => PacketCategory::CarPhysics,
            Record::RaceDefinition(_) => PacketCategory::RaceDefinition,
            Record::Participants(_) => PacketCategory::Participants,
            Record::Timings(_) => PacketCategory::Timings,
            Record::GameState(_) => PacketCategory::GameState,
            Record::TimeStats(_) => PacketCategory::TimeStats,
            Record::ParticipantVehicleNames(_) => PacketCategory::ParticipantVehicleNames,
            Record::VehicleClassNames(_) => PacketCategory::VehicleClassNames,
        }
    }

    pub fn header(&self) -> &Header {
        match self {
            Record::CarPhysics(r) => r.header(),
            Record::RaceDefinition(r) => r.header(),
            Record::Participants(r) => r.header(),
            Record::Timings(r) => r.header(),
            Record::GameState(r) => r.header(),
            Record::TimeStats(r) => r.header(),
            Record::ParticipantVehicleNames(r) => r.header(),
            Record::VehicleClassNames(r) => r.header(),
        }
    }

    /// Re-encode the record into its wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        fn bytes<R: WireFormat>(record: &R) -> Vec<u8> {
            crate::types::to_wire_bytes(record)
        }
        match self {
            Record::CarPhysics(r) => bytes(r.as_ref()),
            Record::RaceDefinition(r) => bytes(r.as_ref()),
            Record::Participants(r) => bytes(r.as_ref()),
            Record::Timings(r) => bytes(r.as_ref()),
            Record::GameState(r) => bytes(r),
            Record::TimeStats(r) => bytes(r.as_ref()),
            Record::ParticipantVehicleNames(r) => bytes(r.as_ref()),
            Record::VehicleClassNames(r) => bytes(r.as_ref()),
        }
    }
}

/// Decode a complete packet buffer with the layout it was resolved to.
///
/// The buffer length must equal the descriptor's fixed length exactly.
pub fn decode(raw: &[u8], descriptor: &LayoutDescriptor) -> Result<Record> {
    descriptor.check_length(raw.len())?;
    let mut reader = WireReader::new(raw);

    let record = match descriptor.category {
        PacketCategory::CarPhysics => Record::CarPhysics(Box::new(reader.read()?)),
        PacketCategory::RaceDefinition => Record::RaceDefinition(Box::new(reader.read()?)),
        PacketCategory::Participants => Record::Participants(Box::new(reader.read()?)),
        PacketCategory::Timings => Record::Timings(Box::new(reader.read()?)),
        PacketCategory::GameState => Record::GameState(reader.read()?),
        PacketCategory::TimeStats => Record::TimeStats(Box::new(reader.read()?)),
        PacketCategory::ParticipantVehicleNames => {
            Record::ParticipantVehicleNames(Box::new(reader.read()?))
        }
        PacketCategory::VehicleClassNames => Record::VehicleClassNames(Box::new(reader.read()?)),
    };

    // A descriptor whose length disagrees with its record type is a table bug
    if reader.remaining() != 0 {
        return Err(TelemetryError::LengthMismatch {
            category: descriptor.category,
            expected: reader.position(),
            actual: raw.len(),
        });
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tables;
    use crate::types::HEADER_SIZE;
    use proptest::prelude::*;

    fn random_packet(descriptor: &LayoutDescriptor) -> impl Strategy<Value = Vec<u8>> {
        let header = Header {
            packet_type: descriptor.packet_type,
            packet_version: descriptor.packet_version,
            partial_packet_number: 1,
            ..Default::default()
        }
        .to_bytes();
        prop::collection::vec(any::<u8>(), descriptor.body_length()).prop_map(move |body| {
            let mut packet = header.to_vec();
            packet.extend_from_slice(&body);
            packet
        })
    }

    fn record_sizes() -> [(usize, &'static LayoutDescriptor); 8] {
        [
            (CarPhysics::SIZE, CarPhysics::layout()),
            (RaceDefinition::SIZE, RaceDefinition::layout()),
            (Participants::SIZE, Participants::layout()),
            (Timings::SIZE, Timings::layout()),
            (GameState::SIZE, GameState::layout()),
            (TimeStats::SIZE, TimeStats::layout()),
            (ParticipantVehicleNames::SIZE, ParticipantVehicleNames::layout()),
            (VehicleClassNames::SIZE, VehicleClassNames::layout()),
        ]
    }

    #[test]
    fn record_sizes_match_layouts() {
        for (size, layout) in record_sizes() {
            assert_eq!(size, layout.length, "{} record size", layout.category);
        }
        assert_eq!(ParticipantInfo::SIZE, tables::PARTICIPANT_INFO.size);
        assert_eq!(ParticipantStatsInfo::SIZE, tables::PARTICIPANT_STATS_INFO.size);
        assert_eq!(VehicleInfo::SIZE, tables::VEHICLE_INFO.size);
        assert_eq!(ClassInfo::SIZE, tables::CLASS_INFO.size);
    }

    #[test]
    fn typed_layout_matches_category() {
        for (_, layout) in record_sizes() {
            assert_eq!(tables::ALL_LAYOUTS[layout.category.index()].category, layout.category);
        }
        assert_eq!(<GameState as CategoryRecord>::CATEGORY, PacketCategory::GameState);
    }

    #[test]
    fn short_and_long_buffers_are_rejected() {
        let descriptor = &tables::GAME_STATE;
        for len in [HEADER_SIZE, descriptor.length - 1, descriptor.length + 1] {
            match decode(&vec![0u8; len], descriptor) {
                Err(TelemetryError::LengthMismatch { category, expected, actual }) => {
                    assert_eq!(category, PacketCategory::GameState);
                    assert_eq!(expected, 22);
                    assert_eq!(actual, len);
                }
                other => panic!("Expected LengthMismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn decode_reports_category_and_header() {
        let mut packet = vec![0u8; tables::GAME_STATE.length];
        packet[4..8].copy_from_slice(&9u32.to_le_bytes());
        packet[10] = 4;
        packet[11] = 2;

        let record = decode(&packet, &tables::GAME_STATE).unwrap();
        assert_eq!(record.category(), PacketCategory::GameState);
        assert_eq!(record.header().category_packet_number, 9);
        assert_eq!(record.to_bytes(), packet);
    }

    #[test]
    fn record_serializes_with_category_tag() {
        let packet = vec![0u8; tables::GAME_STATE.length];
        let record = decode(&packet, &tables::GAME_STATE).unwrap();
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        assert!(yaml.contains("category: GameState"));
        assert!(yaml.contains("build_version_number: 0"));
    }

    proptest! {
        #[test]
        fn car_physics_round_trips(packet in random_packet(&tables::CAR_PHYSICS)) {
            let record = decode(&packet, &tables::CAR_PHYSICS).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn race_definition_round_trips(packet in random_packet(&tables::RACE_DEFINITION)) {
            let record = decode(&packet, &tables::RACE_DEFINITION).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn participants_round_trip(packet in random_packet(&tables::PARTICIPANTS)) {
            let record = decode(&packet, &tables::PARTICIPANTS).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn timings_round_trip(packet in random_packet(&tables::TIMINGS)) {
            let record = decode(&packet, &tables::TIMINGS).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn game_state_round_trips(packet in random_packet(&tables::GAME_STATE)) {
            let record = decode(&packet, &tables::GAME_STATE).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn time_stats_round_trip(packet in random_packet(&tables::TIME_STATS)) {
            let record = decode(&packet, &tables::TIME_STATS).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn vehicle_names_round_trip(packet in random_packet(&tables::PARTICIPANT_VEHICLE_NAMES)) {
            let record = decode(&packet, &tables::PARTICIPANT_VEHICLE_NAMES).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }

        #[test]
        fn class_names_round_trip(packet in random_packet(&tables::VEHICLE_CLASS_NAMES)) {
            let record = decode(&packet, &tables::VEHICLE_CLASS_NAMES).unwrap();
            prop_assert_eq!(record.to_bytes(), packet);
        }
    }
}
