//! Per-participant lap and sector statistics.

use super::CategoryRecord;
use crate::catalog::tables::{self, STREAMER_PARTICIPANTS_SUPPORTED};
use crate::types::{Header, LayoutDescriptor, PacketCategory};

wire_record! {
    /// Per-participant statistics entry.
    pub struct ParticipantStatsInfo {
        pub fastest_lap_time: f32,
        pub last_lap_time: f32,
        pub last_sector_time: f32,
        pub fastest_sector1_time: f32,
        pub fastest_sector2_time: f32,
        pub fastest_sector3_time: f32,
        pub participant_online_rep: u32,
        pub participant_index: u16,
    }
}

wire_record! {
    /// Time stats packet.
    pub struct TimeStats {
        pub header: Header,
        pub participants_changed_timestamp: u32,
        pub stats: [ParticipantStatsInfo; STREAMER_PARTICIPANTS_SUPPORTED],
    }
}

impl TimeStats {
    /// Statistics entry for a participant index, if present.
    pub fn for_participant(&self, participant_index: u16) -> Option<&ParticipantStatsInfo> {
        self.stats.iter().find(|s| s.participant_index == participant_index)
    }
}

impl CategoryRecord for TimeStats {
    const CATEGORY: PacketCategory = PacketCategory::TimeStats;

    fn layout() -> &'static LayoutDescriptor {
        &tables::TIME_STATS
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_participant_index() {
        let mut packet = vec![0u8; tables::TIME_STATS.length];
        let stats = tables::TIME_STATS.field("stats").unwrap();
        let entry = stats.element_offset(4);
        packet[entry..entry + 4].copy_from_slice(&92.25f32.to_le_bytes());
        // participant_index is the last two bytes of the entry
        let index_at = entry + tables::PARTICIPANT_STATS_INFO.size - 2;
        packet[index_at..index_at + 2].copy_from_slice(&7u16.to_le_bytes());

        let time_stats = TimeStats::decode_bytes(&packet).unwrap();
        let entry = time_stats.for_participant(7).unwrap();
        assert_eq!(entry.fastest_lap_time, 92.25);
        assert!(time_stats.for_participant(99).is_none());
    }
}
