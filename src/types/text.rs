//! Fixed-width text fields
//!
//! Names are sent as fixed-size, null-padded byte arrays. The raw bytes are
//! kept as received (including anything after the terminator) so a record
//! re-encodes to exactly the bytes it was decoded from; text decoding happens
//! per field on access, and invalid UTF-8 only affects the field it occurs in.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::wire::{WireFormat, WireReader};
use crate::Result;

/// A text field held invalid UTF-8.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Invalid UTF-8 in text field after {valid_up_to} bytes")]
pub struct TextDecodeError {
    /// Length of the longest valid prefix
    pub valid_up_to: usize,
    /// Bytes before the terminator, as received
    pub bytes: Vec<u8>,
}

/// Bytes before the first null, or the whole slice when there is none.
pub fn text_prefix(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Decode a null-terminated (or full-width) text field as UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<&str, TextDecodeError> {
    let prefix = text_prefix(bytes);
    std::str::from_utf8(prefix)
        .map_err(|e| TextDecodeError { valid_up_to: e.valid_up_to(), bytes: prefix.to_vec() })
}

/// Fixed-width text field of `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedText<const N: usize>([u8; N]);

impl<const N: usize> FixedText<N> {
    /// Wrap raw wire bytes.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Build a null-padded field from a string, truncating at `N` bytes.
    pub fn from_str_padded(text: &str) -> Self {
        let mut bytes = [0u8; N];
        let len = text.len().min(N);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self(bytes)
    }

    /// Raw bytes, including padding.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Decoded text before the first null byte.
    pub fn as_str(&self) -> Result<&str, TextDecodeError> {
        decode_text(&self.0)
    }

    /// Decoded text with invalid sequences replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(text_prefix(&self.0)).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.first().is_none_or(|&b| b == 0)
    }
}

impl<const N: usize> Default for FixedText<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Debug for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(text) => write!(f, "{:?}", text),
            Err(e) => write!(f, "<invalid utf-8: {:?}>", e.bytes),
        }
    }
}

impl<const N: usize> Serialize for FixedText<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_str() {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.serialize_bytes(text_prefix(&self.0)),
        }
    }
}

impl<const N: usize> WireFormat for FixedText<N> {
    const SIZE: usize = N;

    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self(reader.take_array()?))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}
