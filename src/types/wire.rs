//! Bounds-checked little-endian wire codec
//!
//! All layouts are packed, so every value is read at its exact byte offset
//! without alignment. Reads never index past the end of the buffer; a short
//! buffer surfaces as [`TelemetryError::Memory`].

use crate::{Result, TelemetryError};

/// Cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrow the next `len` bytes and advance.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| TelemetryError::out_of_bounds(self.pos, len, self.data.len()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Copy the next `N` bytes into an array and advance.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Decode the next value of type `T`.
    pub fn read<T: WireFormat>(&mut self) -> Result<T> {
        T::decode(self)
    }
}

/// Types with a fixed-size packed wire representation.
pub trait WireFormat: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decode one value at the reader's position.
    fn decode(reader: &mut WireReader<'_>) -> Result<Self>;

    /// Append the wire form of this value.
    fn encode(&self, out: &mut Vec<u8>);
}

macro_rules! impl_wire_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireFormat for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
                    Ok(<$ty>::from_le_bytes(reader.take_array()?))
                }

                fn encode(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_wire_le!(u8, i8, u16, i16, u32, i32, f32);

impl<T: WireFormat, const N: usize> WireFormat for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let offset = reader.position();
        let items = (0..N).map(|_| T::decode(reader)).collect::<Result<Vec<T>>>()?;
        items.try_into().map_err(|_| TelemetryError::out_of_bounds(offset, Self::SIZE, offset))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for item in self {
            item.encode(out);
        }
    }
}

/// Decode exactly `count` consecutive values into a vector.
pub fn decode_vec<T: WireFormat>(reader: &mut WireReader<'_>, count: usize) -> Result<Vec<T>> {
    (0..count).map(|_| T::decode(reader)).collect()
}

/// Encode a value into a fresh buffer.
pub fn to_wire_bytes<T: WireFormat>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(T::SIZE);
    value.encode(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_signed_and_unsigned_from_same_bytes() {
        let data = [0xFFu8, 0xFE, 0xFF];
        let mut unsigned = WireReader::new(&data);
        assert_eq!(unsigned.read::<u8>().unwrap(), 255);
        assert_eq!(unsigned.read::<u16>().unwrap(), 0xFFFE);

        let mut signed = WireReader::new(&data);
        assert_eq!(signed.read::<i8>().unwrap(), -1);
        assert_eq!(signed.read::<i16>().unwrap(), -2);
        assert_eq!(signed.remaining(), 0);
    }

    #[test]
    fn arrays_decode_in_order() {
        let mut data = Vec::new();
        for value in [1.5f32, -2.0, 3.25] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        let mut reader = WireReader::new(&data);
        let values: [f32; 3] = reader.read().unwrap();
        assert_eq!(values, [1.5, -2.0, 3.25]);
        assert_eq!(to_wire_bytes(&values), data);
    }

    #[test]
    fn short_read_is_an_error_not_a_panic() {
        let data = [1u8, 2, 3];
        let mut reader = WireReader::new(&data);
        match reader.read::<u32>() {
            Err(TelemetryError::Memory { offset, needed, len }) => {
                assert_eq!((offset, needed, len), (0, 4, 3));
            }
            other => panic!("Expected Memory error, got {:?}", other),
        }
        // A failed read does not advance the cursor
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn float_bits_survive_round_trip() {
        let nan = f32::from_bits(0x7FC0_1234);
        let bytes = to_wire_bytes(&nan);
        let back: f32 = WireReader::new(&bytes).read().unwrap();
        assert_eq!(back.to_bits(), nan.to_bits());
    }
}
