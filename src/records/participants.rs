//! Participant names, one packet per block of sixteen participants.

use super::CategoryRecord;
use crate::catalog::tables::{self, PARTICIPANT_NAME_LENGTH_MAX, PARTICIPANTS_PER_PACKET};
use crate::types::{FixedText, Header, LayoutDescriptor, PacketCategory};

wire_record! {
    /// Participants packet.
    pub struct Participants {
        pub header: Header,
        /// Matches the timestamp in timings and time stats for the same roster
        pub participants_changed_timestamp: u32,
        pub name: [FixedText<PARTICIPANT_NAME_LENGTH_MAX>; PARTICIPANTS_PER_PACKET],
        pub nationality: [u32; PARTICIPANTS_PER_PACKET],
        /// Participant index for each slot, used to correlate across categories
        pub index: [u16; PARTICIPANTS_PER_PACKET],
    }
}

impl Participants {
    /// Non-empty names paired with their participant index.
    pub fn named(&self) -> impl Iterator<Item = (u16, &FixedText<PARTICIPANT_NAME_LENGTH_MAX>)> {
        self.index.iter().copied().zip(self.name.iter()).filter(|(_, name)| !name.is_empty())
    }
}

impl CategoryRecord for Participants {
    const CATEGORY: PacketCategory = PacketCategory::Participants;

    fn layout() -> &'static LayoutDescriptor {
        &tables::PARTICIPANTS
    }

    fn header(&self) -> &Header {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_pair_with_indices() {
        let mut packet = vec![0u8; tables::PARTICIPANTS.length];
        let names = tables::PARTICIPANTS.field("name").unwrap();
        let indices = tables::PARTICIPANTS.field("index").unwrap();

        let full_width = [b'X'; PARTICIPANT_NAME_LENGTH_MAX];
        let slot0 = names.element_offset(0);
        packet[slot0..slot0 + full_width.len()].copy_from_slice(&full_width);
        let slot3 = names.element_offset(3);
        packet[slot3..slot3 + 5].copy_from_slice(b"Alex\0");
        let index3 = indices.element_offset(3);
        packet[index3..index3 + 2].copy_from_slice(&21u16.to_le_bytes());

        let participants = Participants::decode_bytes(&packet).unwrap();
        let named: Vec<_> = participants.named().collect();
        assert_eq!(named.len(), 2);
        assert_eq!(named[0].1.as_str().unwrap().len(), PARTICIPANT_NAME_LENGTH_MAX);
        assert_eq!(named[1].0, 21);
        assert_eq!(named[1].1.as_str().unwrap(), "Alex");
    }
}
