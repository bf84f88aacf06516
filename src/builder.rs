//! Encode a single frame into a caller-provided buffer.
//!
//! Unlike the incremental, typestate-driven builder this crate's earlier modbus lineage used to
//! assemble a frame field by field, `build_frame` here writes one complete frame from a single
//! payload slice in one call — the wire format has no variable-order fields to prevent out-of-order
//! writes of, so there's no out-of-order case for a typestate to rule out.

use crate::{codec, crc, frame, Error};

/// Stateful encoder: borrows an output buffer and tracks the monotonic frame counter across
/// successive calls to [`FrameBuilder::build_frame`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameBuilder<'b> {
    buffer: &'b mut [u8],
    frame_counter: u16,
}

impl<'b> FrameBuilder<'b> {
    /// Borrows `buffer` as the builder's output, with the counter starting at 0.
    ///
    /// Fails [`Error::BufferTooSmall`] if `buffer.len() < MIN_FRAME_SIZE` — no payload, however
    /// small, could ever be encoded into a smaller buffer.
    pub fn new(buffer: &'b mut [u8]) -> Result<Self, Error> {
        if buffer.len() < frame::MIN_FRAME_SIZE {
            return Err(Error::BufferTooSmall);
        }
        Ok(FrameBuilder {
            buffer,
            frame_counter: 0,
        })
    }

    /// The counter that will be stamped into the *next* successfully built frame.
    pub fn frame_counter(&self) -> u16 {
        self.frame_counter
    }

    /// Jumps the counter directly to `value`, skipping the 65534 calls to [`Self::build_frame`] it
    /// would otherwise take to reach a wrap boundary in a test.
    #[cfg(test)]
    pub(crate) fn seek_frame_counter(&mut self, value: u16) {
        self.frame_counter = value;
    }

    /// Writes one complete frame for `payload` at the start of the builder's buffer and returns
    /// the bytes written.
    ///
    /// Fails [`Error::PayloadTooLarge`] if `payload.len() > MAX_PAYLOAD_SIZE`, or
    /// [`Error::BufferTooSmall`] if the buffer can't hold the resulting frame. The frame counter
    /// only advances on success — a failed build does not consume a counter value.
    pub fn build_frame(&mut self, payload: &[u8]) -> Result<&[u8], Error> {
        if payload.len() > frame::MAX_PAYLOAD_SIZE as usize {
            return Err(Error::PayloadTooLarge);
        }
        let payload_size = payload.len() as u16;
        let frame_size = frame::calculate_frame_size(payload_size);
        if frame_size > self.buffer.len() {
            return Err(Error::BufferTooSmall);
        }

        let header_fields_end = frame::HEADER_SIZE - frame::PAYLOAD_CRC_SIZE;
        self.buffer[0] = frame::PREAMBLE[0];
        self.buffer[1] = frame::PREAMBLE[1];
        codec::write_u16_le(&mut self.buffer[2..4], self.frame_counter);
        codec::write_u16_le(&mut self.buffer[4..6], payload_size);

        let header_crc = crc::crc16(&self.buffer[..header_fields_end]);
        codec::write_u16_le(
            &mut self.buffer[header_fields_end..frame::HEADER_SIZE],
            header_crc,
        );

        let payload_end = frame::HEADER_SIZE + payload.len();
        self.buffer[frame::HEADER_SIZE..payload_end].copy_from_slice(payload);

        let payload_crc = crc::crc16(&self.buffer[frame::HEADER_SIZE..payload_end]);
        codec::write_u16_le(&mut self.buffer[payload_end..frame_size], payload_crc);

        self.frame_counter = self.frame_counter.wrapping_add(1);

        Ok(&self.buffer[..frame_size])
    }
}
