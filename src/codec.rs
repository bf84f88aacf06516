//! Little-endian access to the 16-bit fields that make up a frame header.
//!
//! No validation is performed; callers (the builder and parser) are responsible for addressing
//! valid ranges, exactly as in the rest of this crate's wire-format code.

use byteorder::{ByteOrder, LittleEndian};

/// Reads a little-endian `u16` from the first two bytes of `bytes`.
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    LittleEndian::read_u16(bytes)
}

/// Writes `value` as little-endian bytes into the first two bytes of `bytes`.
pub fn write_u16_le(bytes: &mut [u8], value: u16) {
    LittleEndian::write_u16(bytes, value)
}
