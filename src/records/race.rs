//! Race definition: track identity and reference lap times.

use super::CategoryRecord;
use crate::catalog::tables::{self, TRACK_NAME_LENGTH_MAX};
use crate::types::{FixedText, Header, LayoutDescriptor, PacketCategory};

wire_record! {
    /// Race definition packet.
    pub struct RaceDefinition {
        pub header: Header,
        pub world_fastest_lap_time: f32,
        pub personal_fastest_lap_time: f32,
        pub personal_fastest_sector1_time: f32,
        pub personal_fastest_sector2_time: f32,
        pub personal_fastest_sector3_time: f32,
        pub world_fastest_sector1_time: f32,
        pub world_fastest_sector2_time: f32,
        pub world_fastest_sector3_time: f32,
        pub track_length: f32,
        pub track_location: FixedText<TRACK_NAME_LENGTH_MAX>,
        pub track_variation: FixedText<TRACK_NAME_LENGTH_MAX>,
        pub translated_track_location: FixedText<TRACK_NAME_LENGTH_MAX>,
        pub translated_track_variation: FixedText<TRACK_NAME_LENGTH_MAX>,
        /// Laps or time left in the event, depending on the session format
        pub laps_time_in_event: u16,
        pub enforced_pit_stop_lap: i8,
    }
}

impl CategoryRecord for RaceDefinition {
    const CATEGORY: PacketCategory = PacketCategory::RaceDefinition;

    fn layout() -> &'static LayoutDescriptor {
        &tables::RACE_DEFINITION
    }

    fn header(&self) -> &Header {
        &self.header
    }
}
