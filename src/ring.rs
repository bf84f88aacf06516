//! A fixed-capacity, single-producer/single-consumer byte FIFO over caller-owned storage.
//!
//! This is the ingest surface the streaming parser scans: bytes arrive via [`RingBuffer::append`]
//! and are validated and consumed by [`crate::parser`] without ever being copied into a second
//! buffer first, so a frame's payload may legitimately span the wrap boundary.

use crate::{crc, Error};

/// A circular byte buffer borrowing its storage from the caller.
///
/// `append_index` and `consume_index` are monotonically increasing logical positions rather than
/// values already reduced modulo capacity; the physical storage offset is `index % capacity`. This
/// is what lets `used` (and therefore `free_space`) be *derived* from the two indices instead of
/// tracked as a third field that could drift out of sync with them — the source spec calls deriving
/// it "recommended" for exactly this reason.
///
/// `append` and `consume` both take `&mut self` on this one struct, so there is no safe way to hand
/// a producer one handle and a consumer another that could be driven concurrently — Rust's aliasing
/// rules rule that out, and there is no `split()` into separate producer/consumer types here. A
/// single `RingBuffer` has exactly one mutator at a time, same as any other `&mut self` type. If a
/// producer and a consumer really do live in different contexts (an interrupt handler appending,
/// `main` consuming; two threads; etc.), the caller is responsible for its own synchronization —
/// a mutex, a critical section, or handing the whole buffer across contexts at message-passing
/// boundaries so only one side ever touches it at a time. This crate does not attempt to provide a
/// lock-free cross-context split; see `RingBuffer::append`/`RingBuffer::consume` and this module's
/// grounding note in `DESIGN.md` for why.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingBuffer<'b> {
    storage: &'b mut [u8],
    append_index: usize,
    consume_index: usize,
}

impl<'b> RingBuffer<'b> {
    /// Initializes a ring buffer over `storage`, zeroing it.
    ///
    /// Fails [`Error::BufferTooSmall`] if `storage` is empty.
    pub fn new(storage: &'b mut [u8]) -> Result<Self, Error> {
        if storage.is_empty() {
            return Err(Error::BufferTooSmall);
        }
        storage.fill(0);
        Ok(RingBuffer {
            storage,
            append_index: 0,
            consume_index: 0,
        })
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes currently available to consume.
    pub fn used(&self) -> usize {
        self.append_index.wrapping_sub(self.consume_index)
    }

    /// Bytes currently free for `append`.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Copies `items` into the buffer, splitting the copy across the wrap boundary as needed.
    ///
    /// Fails [`Error::InsufficientSpace`] if `items.len() > free_space()`.
    pub fn append(&mut self, items: &[u8]) -> Result<(), Error> {
        let n = items.len();
        if n > self.free_space() {
            return Err(Error::InsufficientSpace);
        }
        let cap = self.capacity();
        let start = self.append_index % cap;
        let first = (cap - start).min(n);
        self.storage[start..start + first].copy_from_slice(&items[..first]);
        if first < n {
            self.storage[..n - first].copy_from_slice(&items[first..]);
        }
        self.append_index = self.append_index.wrapping_add(n);
        Ok(())
    }

    /// Copies `n = out.len()` bytes out of the buffer, starting at `consume_index`.
    ///
    /// Fails [`Error::InsufficientSpace`] if `out.len() > used()`.
    pub fn consume(&mut self, out: &mut [u8]) -> Result<(), Error> {
        let n = out.len();
        if n > self.used() {
            return Err(Error::InsufficientSpace);
        }
        let cap = self.capacity();
        let start = self.consume_index % cap;
        let first = (cap - start).min(n);
        out[..first].copy_from_slice(&self.storage[start..start + first]);
        if first < n {
            out[first..].copy_from_slice(&self.storage[..n - first]);
        }
        self.consume_index = self.consume_index.wrapping_add(n);
        Ok(())
    }

    /// Advances `consume_index` by `n` bytes without copying them out.
    ///
    /// Used by the streaming parser both to skip leading garbage ahead of a located preamble and
    /// to retire a fully-validated frame. Fails [`Error::InsufficientSpace`] if `n > used()`.
    pub fn advance_consume(&mut self, n: usize) -> Result<(), Error> {
        if n > self.used() {
            return Err(Error::InsufficientSpace);
        }
        self.consume_index = self.consume_index.wrapping_add(n);
        Ok(())
    }

    /// Reads the byte at logical `offset` from `consume_index`, without advancing.
    ///
    /// Fails [`Error::InsufficientSpace`] if `offset >= used()`.
    pub fn peek_byte(&self, offset: usize) -> Result<u8, Error> {
        if offset >= self.used() {
            return Err(Error::InsufficientSpace);
        }
        Ok(self.storage[self.physical_index(offset)])
    }

    /// Reads a little-endian `u16` at logical `offset` from `consume_index`.
    pub fn peek_u16_le(&self, offset: usize) -> Result<u16, Error> {
        let lo = self.peek_byte(offset)?;
        let hi = self.peek_byte(offset + 1)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Computes CRC-16/CCITT-FALSE over `count` bytes starting at logical `offset` from
    /// `consume_index`, folding across the wrap boundary when the range crosses it.
    pub fn wrap_aware_crc(&self, offset: usize, count: usize) -> Result<u16, Error> {
        if offset.saturating_add(count) > self.used() {
            return Err(Error::InsufficientSpace);
        }
        let cap = self.capacity();
        let start = (self.consume_index + offset) % cap;
        let first = (cap - start).min(count);
        let mut crc = crc::update(crc::INIT, &self.storage[start..start + first]);
        if first < count {
            crc = crc::update(crc, &self.storage[..count - first]);
        }
        Ok(crc)
    }

    /// Maps a logical offset from `consume_index` to a physical storage index.
    ///
    /// Used by [`crate::parser`] to capture a stable physical anchor for a frame's payload so that
    /// [`crate::frame::FrameDescriptor::copy_payload`] can read it back after `consume_index` has
    /// moved on past the frame that was delivered.
    pub(crate) fn physical_index(&self, offset: usize) -> usize {
        (self.consume_index + offset) % self.capacity()
    }

    /// Copies `count` bytes starting at the physical storage index `start`, wrap-aware.
    ///
    /// Unlike [`Self::consume`], this addresses storage directly rather than relative to
    /// `consume_index`, and does not advance any index. It is the mechanism behind
    /// [`crate::frame::FrameDescriptor::copy_payload`].
    pub(crate) fn copy_physical(&self, start: usize, count: usize, out: &mut [u8]) {
        let cap = self.capacity();
        let first = (cap - start).min(count);
        out[..first].copy_from_slice(&self.storage[start..start + first]);
        if first < count {
            out[first..count].copy_from_slice(&self.storage[..count - first]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RingBuffer;
    use crate::Error;

    #[test]
    fn rejects_zero_capacity() {
        let mut storage: [u8; 0] = [];
        assert_eq!(RingBuffer::new(&mut storage), Err(Error::BufferTooSmall));
    }

    #[test]
    fn fresh_buffer_is_empty() {
        let mut storage = [0u8; 8];
        let ring = RingBuffer::new(&mut storage).unwrap();
        assert_eq!(ring.used(), 0);
        assert_eq!(ring.free_space(), 8);
    }

    #[test]
    fn append_then_consume_round_trips() {
        let mut storage = [0u8; 8];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        ring.append(&[1, 2, 3]).unwrap();
        assert_eq!(ring.used(), 3);
        assert_eq!(ring.free_space(), 5);

        let mut out = [0u8; 3];
        ring.consume(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
        assert_eq!(ring.used(), 0);
        assert_eq!(ring.free_space(), 8);
    }

    #[test]
    fn append_fails_when_insufficient_space() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        assert_eq!(
            ring.append(&[1, 2, 3, 4, 5]),
            Err(Error::InsufficientSpace)
        );
        // no partial write on failure
        assert_eq!(ring.used(), 0);
    }

    #[test]
    fn consume_fails_when_insufficient_data() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        ring.append(&[1, 2]).unwrap();
        let mut out = [0u8; 3];
        assert_eq!(ring.consume(&mut out), Err(Error::InsufficientSpace));
    }

    #[test]
    fn payload_spans_the_wrap_boundary() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        ring.append(&[1, 2, 3]).unwrap();
        let mut out = [0u8; 3];
        ring.consume(&mut out).unwrap();
        // append_index is now 3, consume_index 3; appending 3 more wraps
        ring.append(&[4, 5, 6]).unwrap();
        let mut out = [0u8; 3];
        ring.consume(&mut out).unwrap();
        assert_eq!(out, [4, 5, 6]);
    }

    #[test]
    fn used_plus_free_space_always_equals_capacity() {
        let mut storage = [0u8; 5];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        let ops: [(bool, usize); 6] = [
            (true, 3),
            (false, 2),
            (true, 4),
            (false, 1),
            (true, 3),
            (false, 5),
        ];
        for (is_append, n) in ops {
            if is_append {
                if ring.append(&vec![0xAA; n]).is_ok() {
                    assert_eq!(ring.used() + ring.free_space(), ring.capacity());
                }
            } else {
                let mut out = vec![0u8; n];
                if ring.consume(&mut out).is_ok() {
                    assert_eq!(ring.used() + ring.free_space(), ring.capacity());
                }
            }
        }
    }

    #[test]
    fn peek_byte_out_of_range() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        ring.append(&[9]).unwrap();
        assert_eq!(ring.peek_byte(0), Ok(9));
        assert_eq!(ring.peek_byte(1), Err(Error::InsufficientSpace));
    }

    #[test]
    fn wrap_aware_crc_matches_linear_crc_across_the_boundary() {
        let mut storage = [0u8; 4];
        let mut ring = RingBuffer::new(&mut storage).unwrap();
        ring.append(&[1, 2, 3]).unwrap();
        let mut out = [0u8; 3];
        ring.consume(&mut out).unwrap();
        ring.append(&[4, 5, 6]).unwrap();

        let via_ring = ring.wrap_aware_crc(0, 3).unwrap();
        let linear = crate::crc::crc16(&[4, 5, 6]);
        assert_eq!(via_ring, linear);
    }
}
