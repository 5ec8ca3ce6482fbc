//! Telemetry categories and wire packet type codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Packet type codes as sent in the header's `packet_type` byte.
pub mod packet_type {
    pub const CAR_PHYSICS: u8 = 0;
    pub const RACE_DEFINITION: u8 = 1;
    pub const PARTICIPANTS: u8 = 2;
    pub const TIMINGS: u8 = 3;
    pub const GAME_STATE: u8 = 4;
    /// Defined by the game but never sent; weather lives in the game state packet.
    pub const WEATHER_STATE: u8 = 5;
    /// Defined by the game but never sent.
    pub const VEHICLE_NAMES: u8 = 6;
    pub const TIME_STATS: u8 = 7;
    /// Carries both participant vehicle names and vehicle class names.
    pub const PARTICIPANT_VEHICLE_NAMES: u8 = 8;
}

/// Logical telemetry record kind. Each category owns one snapshot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PacketCategory {
    CarPhysics,
    RaceDefinition,
    Participants,
    Timings,
    GameState,
    TimeStats,
    ParticipantVehicleNames,
    VehicleClassNames,
}

impl PacketCategory {
    /// Number of categories.
    pub const COUNT: usize = 8;

    /// Every category, in slot order.
    pub const ALL: [PacketCategory; Self::COUNT] = [
        PacketCategory::CarPhysics,
        PacketCategory::RaceDefinition,
        PacketCategory::Participants,
        PacketCategory::Timings,
        PacketCategory::GameState,
        PacketCategory::TimeStats,
        PacketCategory::ParticipantVehicleNames,
        PacketCategory::VehicleClassNames,
    ];

    /// Slot index used by the snapshot.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire packet type this category is sent with.
    pub const fn packet_type(self) -> u8 {
        match self {
            PacketCategory::CarPhysics => packet_type::CAR_PHYSICS,
            PacketCategory::RaceDefinition => packet_type::RACE_DEFINITION,
            PacketCategory::Participants => packet_type::PARTICIPANTS,
            PacketCategory::Timings => packet_type::TIMINGS,
            PacketCategory::GameState => packet_type::GAME_STATE,
            PacketCategory::TimeStats => packet_type::TIME_STATS,
            PacketCategory::ParticipantVehicleNames | PacketCategory::VehicleClassNames => {
                packet_type::PARTICIPANT_VEHICLE_NAMES
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PacketCategory::CarPhysics => "car physics",
            PacketCategory::RaceDefinition => "race definition",
            PacketCategory::Participants => "participants",
            PacketCategory::Timings => "timings",
            PacketCategory::GameState => "game state",
            PacketCategory::TimeStats => "time stats",
            PacketCategory::ParticipantVehicleNames => "participant vehicle names",
            PacketCategory::VehicleClassNames => "vehicle class names",
        }
    }
}

impl fmt::Display for PacketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_indices_follow_all_order() {
        for (i, category) in PacketCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn name_tables_share_a_packet_type() {
        assert_eq!(
            PacketCategory::ParticipantVehicleNames.packet_type(),
            PacketCategory::VehicleClassNames.packet_type()
        );
        assert_eq!(PacketCategory::TimeStats.packet_type(), 7);
        assert_eq!(PacketCategory::GameState.to_string(), "game state");
    }
}
