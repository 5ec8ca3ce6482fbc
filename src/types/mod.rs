//! Core types for the telemetry wire format.
//!
//! This module provides the foundational data structures shared by the
//! catalog, decoders, reassembler and snapshot.
//!
//! ## Architecture
//!
//! - [`Header`] is the 12-byte common header at the start of every datagram
//! - [`PacketCategory`] names the logical record kinds, one snapshot slot each
//! - [`FieldType`], [`FieldLayout`] and [`LayoutDescriptor`] describe packed layouts
//! - [`WireFormat`] decodes and re-encodes packed values with bounds checking
//! - [`FixedText`] keeps fixed-width text bytes and decodes them per field
//! - [`Value`] holds dynamically decoded fields
//!
//! ## Usage Example
//!
//! ```rust
//! use sms_udp::types::{parse_header, HEADER_SIZE};
//!
//! let mut datagram = vec![0u8; HEADER_SIZE];
//! datagram[0..4].copy_from_slice(&42u32.to_le_bytes());
//! datagram[9] = 1; // single part
//! datagram[10] = 4; // game state
//! datagram[11] = 2; // version
//!
//! let header = parse_header(&datagram).unwrap();
//! assert_eq!(header.packet_number, 42);
//! assert!(header.is_single_part());
//! ```

mod category;
mod field_type;
mod header;
mod layout;
mod sequence;
mod text;
mod update_rate;
mod value;
mod wire;

// Re-export all public types
pub use category::{PacketCategory, packet_type};
pub use field_type::FieldType;
pub use header::{HEADER_SIZE, Header, parse_header, split_datagram};
pub use layout::{FieldLayout, LayoutDescriptor, RecordLayout, place, span};
pub use sequence::sequence_after;
pub use text::{FixedText, TextDecodeError, decode_text, text_prefix};
pub use update_rate::UpdateRate;
pub use value::Value;
pub use wire::{WireFormat, WireReader, decode_vec, to_wire_bytes};
