//! Timings: positions and current lap state for every participant.

use super::CategoryRecord;
use crate::catalog::tables::{self, STREAMER_PARTICIPANTS_SUPPORTED};
use crate::types::{Header, LayoutDescriptor, PacketCategory};

wire_record! {
    /// Per-participant timing entry.
    pub struct ParticipantInfo {
        pub world_position: [i16; 3],
        pub orientation: [i16; 3],
        pub current_lap_distance: u16,
        pub race_position: u8,
        pub sector: u8,
        pub highest_flag: u8,
        pub pit_mode_schedule: u8,
        pub car_index: u16,
        pub race_state: u8,
        pub current_lap: u8,
        pub current_time: f32,
        pub current_sector_time: f32,
        pub participant_index: u16,
    }
}

wire_record! {
    /// Timings packet.
    pub struct Timings {
        pub header: Header,
        pub num_participants: i8,
        pub participants_changed_timestamp: u32,
        pub event_time_remaining: f32,
        pub split_time_ahead: f32,
        pub split_time_behind: f32,
        pub split_time: f32,
        pub participants: [ParticipantInfo; STREAMER_PARTICIPANTS_SUPPORTED],
        pub local_participant_index: u16,
        pub tick_count: u32,
    }
}

impl Timings {
    /// Entries for the participants actually in the session.
    pub fn active_participants(&self) -> &[ParticipantInfo] {
        let count = usize::try_from(self.num_participants).unwrap_or(0);
        &self.participants[..count.min(STREAMER_PARTICIPANTS_SUPPORTED)]
    }
}

impl CategoryRecord for Timings {
    const CATEGORY: PacketCategory = PacketCategory::Timings;

    fn layout() -> &'static LayoutDescriptor {
        &tables::TIMINGS
    }

    fn header(&self) -> &Header {
        &self.header
    }
}
