//! Wire field type definitions

use super::layout::RecordLayout;

/// Packed wire types used by the telemetry layouts.
///
/// Width and signedness are exact: several fields share a byte width but
/// differ in interpretation (signed temperatures next to unsigned percentages).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// 8-bit signed integer (maps to `char` / `signed char`)
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 32-bit floating point
    Float32,
    /// Fixed-width, null-padded text of the given byte width
    Text(usize),
    /// Nested packed record
    Record(&'static RecordLayout),
}

impl FieldType {
    /// Returns the size in bytes of one element of this type.
    pub const fn size(&self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::UInt32 | FieldType::Float32 => 4,
            FieldType::Text(width) => *width,
            FieldType::Record(layout) => layout.size,
        }
    }
}
