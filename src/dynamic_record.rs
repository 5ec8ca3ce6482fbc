//! Dynamic by-name view over one stored packet.
//!
//! This view provides field lookups by name without a typed record, walking
//! the layout's field plan at runtime. It is intended for exploration,
//! tooling, logging and dashboards. For hot paths, prefer the typed records
//! in [`crate::records`], which decode every field in one pass.

use serde::Serialize;
use std::sync::Arc;

use crate::types::{
    FieldLayout, FieldType, Header, LayoutDescriptor, PacketCategory, Value, WireFormat,
    WireReader, decode_text, parse_header,
};
use crate::{Result, TelemetryError};

/// A self-contained view over a single complete packet supporting by-name lookups.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    data: Arc<[u8]>,
    descriptor: &'static LayoutDescriptor,
}

impl DynamicRecord {
    /// Wrap a packet buffer; the length must match the layout exactly.
    pub fn new(data: Arc<[u8]>, descriptor: &'static LayoutDescriptor) -> Result<Self> {
        descriptor.check_length(data.len())?;
        Ok(Self { data, descriptor })
    }

    pub fn category(&self) -> PacketCategory {
        self.descriptor.category
    }

    pub fn descriptor(&self) -> &'static LayoutDescriptor {
        self.descriptor
    }

    pub fn header(&self) -> Result<Header> {
        parse_header(&self.data)
    }

    /// Decode one top-level field by name.
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self.descriptor.field(name).ok_or_else(|| TelemetryError::FieldNotFound {
            category: self.descriptor.category,
            field: name.to_string(),
        })?;
        read_field(&self.data, field, 0)
    }

    /// Convenience typed helpers
    pub fn f32(&self, name: &str) -> Option<f32> {
        self.get(name).ok()?.as_f32()
    }
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).ok()?.as_i64()
    }
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).ok()?.as_text().map(str::to_string)
    }

    /// Per-element floats of an array field, such as the four wheel values.
    pub fn f32_array(&self, name: &str) -> Option<Vec<f32>> {
        self.get(name).ok()?.as_array()?.iter().map(Value::as_f32).collect()
    }

    /// Decode every top-level field, in wire order.
    pub fn to_value(&self) -> Result<Value> {
        let fields = self
            .descriptor
            .fields
            .iter()
            .map(|field| Ok((field.name, read_field(&self.data, field, 0)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Record(fields))
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error;
        self.to_value().map_err(S::Error::custom)?.serialize(serializer)
    }
}

fn read_field(data: &[u8], field: &FieldLayout, base: usize) -> Result<Value> {
    if field.count == 1 {
        return read_element(data, &field.field_type, base + field.offset);
    }
    (0..field.count)
        .map(|index| read_element(data, &field.field_type, base + field.element_offset(index)))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn read_element(data: &[u8], field_type: &FieldType, offset: usize) -> Result<Value> {
    let bytes = data
        .get(offset..offset + field_type.size())
        .ok_or_else(|| TelemetryError::out_of_bounds(offset, field_type.size(), data.len()))?;

    Ok(match field_type {
        FieldType::Int8 => Value::Int8(scalar(bytes)?),
        FieldType::UInt8 => Value::UInt8(scalar(bytes)?),
        FieldType::Int16 => Value::Int16(scalar(bytes)?),
        FieldType::UInt16 => Value::UInt16(scalar(bytes)?),
        FieldType::UInt32 => Value::UInt32(scalar(bytes)?),
        FieldType::Float32 => Value::Float32(scalar(bytes)?),
        FieldType::Text(_) => Value::Text(decode_text(bytes).map(str::to_string)),
        FieldType::Record(record) => Value::Record(
            record
                .fields
                .iter()
                .map(|field| Ok((field.name, read_field(data, field, offset)?)))
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}

fn scalar<T: WireFormat>(bytes: &[u8]) -> Result<T> {
    WireReader::new(bytes).read()
}
