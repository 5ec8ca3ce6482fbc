//! Declarative packed layouts
//!
//! A layout is an ordered field list. Offsets are assigned at compile time by
//! [`place`], so a descriptor's total length is derived from its fields and
//! cannot drift from them.

use super::{FieldType, HEADER_SIZE, PacketCategory};
use crate::{Result, TelemetryError};

/// One field of a packed layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    /// Field name as exposed through dynamic access
    pub name: &'static str,
    /// Element type
    pub field_type: FieldType,
    /// Byte offset from the start of the enclosing buffer
    pub offset: usize,
    /// Number of elements (1 for scalar, >1 for arrays)
    pub count: usize,
}

impl FieldLayout {
    /// Scalar field, offset assigned later by [`place`].
    pub const fn scalar(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type, offset: 0, count: 1 }
    }

    /// Fixed-count array field, offset assigned later by [`place`].
    pub const fn array(name: &'static str, field_type: FieldType, count: usize) -> Self {
        Self { name, field_type, offset: 0, count }
    }

    /// Total bytes covered by this field.
    pub const fn size(&self) -> usize {
        self.field_type.size() * self.count
    }

    /// Offset one past the last byte of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.size()
    }

    /// Offset of the `index`-th element.
    pub const fn element_offset(&self, index: usize) -> usize {
        self.offset + index * self.field_type.size()
    }
}

/// Assign consecutive packed offsets to `fields`, starting at `start`.
pub const fn place<const N: usize>(mut fields: [FieldLayout; N], start: usize) -> [FieldLayout; N] {
    let mut offset = start;
    let mut i = 0;
    while i < N {
        fields[i].offset = offset;
        offset += fields[i].size();
        i += 1;
    }
    fields
}

/// End offset of the last field, or 0 for an empty list.
pub const fn span(fields: &[FieldLayout]) -> usize {
    match fields.last() {
        Some(last) => last.end(),
        None => 0,
    }
}

/// A nested packed record used as an array element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordLayout {
    pub name: &'static str,
    /// Fields with offsets relative to the record start
    pub fields: &'static [FieldLayout],
    pub size: usize,
}

impl RecordLayout {
    pub const fn new(name: &'static str, fields: &'static [FieldLayout]) -> Self {
        Self { name, fields, size: span(fields) }
    }
}

/// Static layout metadata for one (packet_type, packet_version) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDescriptor {
    pub category: PacketCategory,
    pub packet_type: u8,
    pub packet_version: u8,
    /// Exact total datagram length, header included
    pub length: usize,
    /// Body fields, offsets relative to the start of the datagram
    pub fields: &'static [FieldLayout],
}

impl LayoutDescriptor {
    pub const fn new(
        category: PacketCategory,
        packet_type: u8,
        packet_version: u8,
        fields: &'static [FieldLayout],
    ) -> Self {
        Self { category, packet_type, packet_version, length: span(fields), fields }
    }

    /// Body length after the common header.
    pub const fn body_length(&self) -> usize {
        self.length - HEADER_SIZE
    }

    /// Look up a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldLayout> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Names of all top-level fields in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Fail unless `len` is exactly this layout's length.
    pub fn check_length(&self, len: usize) -> Result<()> {
        if len != self.length {
            return Err(TelemetryError::LengthMismatch {
                category: self.category,
                expected: self.length,
                actual: len,
            });
        }
        Ok(())
    }

    /// Validate that the field plan tiles the body without gaps.
    pub fn validate(&self) -> Result<()> {
        validate_tiling(self.fields, HEADER_SIZE, self.length)
    }
}

fn validate_tiling(fields: &[FieldLayout], start: usize, end: usize) -> Result<()> {
    let mut expected = start;
    for field in fields {
        if field.offset != expected || field.count == 0 {
            return Err(TelemetryError::config(format!(
                "Field '{}' at offset {} (count {}) breaks packed layout, expected offset {}",
                field.name, field.offset, field.count, expected
            )));
        }
        if let FieldType::Record(record) = field.field_type {
            validate_tiling(record.fields, 0, record.size)?;
        }
        expected = field.end();
    }

    if expected != end {
        return Err(TelemetryError::config(format!(
            "Layout ends at {} but declares {} bytes",
            expected, end
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER_FIELDS: &[FieldLayout] = &place(
        [FieldLayout::scalar("a", FieldType::UInt16), FieldLayout::array("b", FieldType::Int8, 3)],
        0,
    );
    const INNER: RecordLayout = RecordLayout::new("Inner", INNER_FIELDS);

    const OUTER_FIELDS: &[FieldLayout] = &place(
        [
            FieldLayout::scalar("flag", FieldType::UInt8),
            FieldLayout::array("items", FieldType::Record(&INNER), 2),
            FieldLayout::scalar("label", FieldType::Text(6)),
        ],
        HEADER_SIZE,
    );

    #[test]
    fn place_assigns_packed_offsets() {
        assert_eq!(INNER.size, 5);
        assert_eq!(OUTER_FIELDS[0].offset, 12);
        assert_eq!(OUTER_FIELDS[1].offset, 13);
        assert_eq!(OUTER_FIELDS[1].element_offset(1), 18);
        assert_eq!(OUTER_FIELDS[2].offset, 23);
        assert_eq!(span(OUTER_FIELDS), 29);
    }

    #[test]
    fn descriptor_derives_length_and_validates() {
        let descriptor = LayoutDescriptor::new(PacketCategory::GameState, 4, 2, OUTER_FIELDS);
        assert_eq!(descriptor.length, 29);
        assert_eq!(descriptor.body_length(), 17);
        descriptor.validate().unwrap();
        assert!(descriptor.field("label").is_some());
        assert!(descriptor.field("missing").is_none());
        assert_eq!(descriptor.field_names().collect::<Vec<_>>(), vec!["flag", "items", "label"]);
    }

    #[test]
    fn check_length_is_exact() {
        let descriptor = LayoutDescriptor::new(PacketCategory::GameState, 4, 2, OUTER_FIELDS);
        descriptor.check_length(29).unwrap();
        for len in [28, 30] {
            match descriptor.check_length(len) {
                Err(TelemetryError::LengthMismatch { expected, actual, .. }) => {
                    assert_eq!(expected, 29);
                    assert_eq!(actual, len);
                }
                other => panic!("Expected LengthMismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn gaps_fail_validation() {
        static GAPPY: [FieldLayout; 2] = [
            FieldLayout { name: "x", field_type: FieldType::UInt8, offset: 12, count: 1 },
            FieldLayout { name: "y", field_type: FieldType::UInt8, offset: 14, count: 1 },
        ];
        let descriptor = LayoutDescriptor::new(PacketCategory::GameState, 4, 2, &GAPPY);
        assert!(descriptor.validate().is_err());
    }
}
