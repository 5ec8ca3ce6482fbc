//! Common packet header present at the start of every datagram
//!
//! ```c
//! struct PacketBase {
//!     unsigned int  mPacketNumber;          // offset 0, counter across all categories
//!     unsigned int  mCategoryPacketNumber;  // offset 4, counter within one category
//!     unsigned char mPartialPacketIndex;    // offset 8, 0-based part position
//!     unsigned char mPartialPacketNumber;   // offset 9, total parts
//!     unsigned char mPacketType;            // offset 10
//!     unsigned char mPacketVersion;         // offset 11
//! };
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::wire::{WireFormat, WireReader};
use crate::{Result, TelemetryError};

/// Size of the common header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Parsed common packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Header {
    /// Monotonic counter across all categories
    pub packet_number: u32,
    /// Counter within this packet's category, used as the reassembly key
    pub category_packet_number: u32,
    /// 0-based position of this part
    pub partial_packet_index: u8,
    /// Total number of parts of the logical packet
    pub partial_packet_number: u8,
    /// Selects the category
    pub packet_type: u8,
    /// Selects the layout within the category
    pub packet_version: u8,
}

impl Header {
    /// A packet whose single part is complete on arrival.
    pub fn is_single_part(&self) -> bool {
        self.partial_packet_number <= 1
    }

    /// Whether the part index lies inside the declared part count.
    pub fn has_valid_part_index(&self) -> bool {
        self.partial_packet_number >= 1 && self.partial_packet_index < self.partial_packet_number
    }

    /// Serialize back into the 12-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        self.encode(&mut out);
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }
}

impl WireFormat for Header {
    const SIZE: usize = HEADER_SIZE;

    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            packet_number: reader.read()?,
            category_packet_number: reader.read()?,
            partial_packet_index: reader.read()?,
            partial_packet_number: reader.read()?,
            packet_type: reader.read()?,
            packet_version: reader.read()?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.packet_number.encode(out);
        self.category_packet_number.encode(out);
        self.partial_packet_index.encode(out);
        self.partial_packet_number.encode(out);
        self.packet_type.encode(out);
        self.packet_version.encode(out);
    }
}

/// Parse the common header from the start of a datagram.
///
/// Reads only the first [`HEADER_SIZE`] bytes; the rest of the buffer is not copied.
pub fn parse_header(buffer: &[u8]) -> Result<Header> {
    if buffer.len() < HEADER_SIZE {
        return Err(TelemetryError::TooShort { len: buffer.len(), required: HEADER_SIZE });
    }

    let header = WireReader::new(&buffer[..HEADER_SIZE]).read::<Header>()?;
    trace!(
        packet_type = header.packet_type,
        version = header.packet_version,
        part = header.partial_packet_index,
        parts = header.partial_packet_number,
        "Parsed header"
    );
    Ok(header)
}

/// Split a datagram into its parsed header and the borrowed body bytes.
pub fn split_datagram(buffer: &[u8]) -> Result<(Header, &[u8])> {
    let header = parse_header(buffer)?;
    Ok((header, &buffer[HEADER_SIZE..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0102_0304u32.to_le_bytes());
        data.extend_from_slice(&77u32.to_le_bytes());
        data.extend_from_slice(&[1, 3, 8, 2]);
        data.extend_from_slice(&[0xAA, 0xBB]);
        data
    }

    #[test]
    fn parses_little_endian_fields() {
        let header = parse_header(&sample_bytes()).unwrap();

        assert_eq!(header.packet_number, 0x0102_0304);
        assert_eq!(header.category_packet_number, 77);
        assert_eq!(header.partial_packet_index, 1);
        assert_eq!(header.partial_packet_number, 3);
        assert_eq!(header.packet_type, 8);
        assert_eq!(header.packet_version, 2);
        assert!(!header.is_single_part());
        assert!(header.has_valid_part_index());
    }

    #[test]
    fn split_borrows_body() {
        let data = sample_bytes();
        let (_, body) = split_datagram(&data).unwrap();
        assert_eq!(body, &[0xAA, 0xBB]);
        assert_eq!(body.as_ptr(), data[HEADER_SIZE..].as_ptr());
    }

    #[test]
    fn to_bytes_matches_wire_form() {
        let data = sample_bytes();
        let header = parse_header(&data).unwrap();
        assert_eq!(header.to_bytes().as_slice(), &data[..HEADER_SIZE]);
    }

    #[test]
    fn part_index_validation() {
        let mut header = Header { partial_packet_number: 2, partial_packet_index: 2, ..Default::default() };
        assert!(!header.has_valid_part_index());

        header.partial_packet_number = 0;
        header.partial_packet_index = 0;
        assert!(!header.has_valid_part_index());
    }

    proptest! {
        #[test]
        fn short_buffers_are_rejected(data in prop::collection::vec(any::<u8>(), 0..HEADER_SIZE)) {
            match parse_header(&data) {
                Err(TelemetryError::TooShort { len, required }) => {
                    prop_assert_eq!(len, data.len());
                    prop_assert_eq!(required, HEADER_SIZE);
                }
                other => prop_assert!(false, "expected TooShort, got {:?}", other),
            }
        }

        #[test]
        fn any_long_enough_buffer_parses(data in prop::collection::vec(any::<u8>(), HEADER_SIZE..64)) {
            let header = parse_header(&data).unwrap();
            let bytes = header.to_bytes();
            prop_assert_eq!(bytes.as_slice(), &data[..HEADER_SIZE]);
        }
    }
}
