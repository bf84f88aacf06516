//! Scan a ring buffer for valid frames, validating both CRCs, and recover from single-byte
//! corruption by resuming the search one byte past the last bad candidate.
//!
//! This is the hard part of the codec. [`FrameParser::parse_frame`] parses exactly one frame
//! starting at the ring's current consume position; [`FrameParser::parse_frames`] is the streaming
//! entry point transports actually drive, repeatedly scanning for the preamble and resyncing past
//! anything that doesn't validate.

use crate::{
    frame::{self, FrameDescriptor, HEADER_SIZE, MIN_FRAME_SIZE, PAYLOAD_CRC_SIZE, PREAMBLE},
    ring::RingBuffer,
    Error,
};

/// Namespace for the two parsing operations. Carries no state of its own — all state lives in the
/// [`RingBuffer`] being parsed.
pub struct FrameParser;

impl FrameParser {
    /// Attempts to parse exactly one frame starting at the ring's current consume position.
    ///
    /// On success, advances the ring's consume index past the whole frame (header, payload, and
    /// payload CRC) and returns a [`FrameDescriptor`] borrowing the ring. On failure, the consume
    /// index is left untouched — callers that want single-byte resynchronization after a validation
    /// failure should use [`Self::parse_frames`] rather than retrying this directly.
    pub fn parse_frame<'a, 'b>(
        ring: &'a mut RingBuffer<'b>,
    ) -> Result<FrameDescriptor<'a, 'b>, Error> {
        // NEED_HEADER
        if ring.used() < MIN_FRAME_SIZE {
            return Err(Error::IncompleteFrame);
        }
        if ring.peek_byte(0)? != PREAMBLE[0] || ring.peek_byte(1)? != PREAMBLE[1] {
            return Err(Error::InvalidPreamble);
        }
        let frame_counter = ring.peek_u16_le(2)?;
        let payload_size = ring.peek_u16_le(4)?;
        let header_crc = ring.peek_u16_le(6)?;
        let header_fields_len = HEADER_SIZE - PAYLOAD_CRC_SIZE;
        let computed_header_crc = ring.wrap_aware_crc(0, header_fields_len)?;
        if computed_header_crc != header_crc {
            return Err(Error::InvalidHeaderCrc);
        }

        // HEADER_VALIDATED -> NEED_PAYLOAD
        let payload_len = payload_size as usize;
        let expected_frame_size = frame::calculate_frame_size(payload_size);
        if ring.used() < expected_frame_size {
            return Err(Error::IncompleteFrame);
        }

        // NEED_PAYLOAD
        let payload_crc_offset = HEADER_SIZE + payload_len;
        let payload_crc = ring.peek_u16_le(payload_crc_offset)?;
        let computed_payload_crc = ring.wrap_aware_crc(HEADER_SIZE, payload_len)?;
        if computed_payload_crc != payload_crc {
            return Err(Error::InvalidPayloadCrc);
        }

        // DONE
        let payload_start = ring.physical_index(HEADER_SIZE);
        ring.advance_consume(expected_frame_size)?;

        Ok(FrameDescriptor::new(
            ring,
            frame_counter,
            payload_size,
            header_crc,
            payload_crc,
            payload_start,
        ))
    }

    /// Repeatedly parses frames out of `ring`, invoking `callback` for each one delivered, and
    /// returns the number of frames delivered.
    ///
    /// After a frame fails to validate for any reason other than "incomplete", the consume origin
    /// slides forward by exactly one byte and the scan resumes — this guarantees that a single-byte
    /// corruption damages at most one frame, at the cost of a slower per-byte scan on the unhappy
    /// path. `IncompleteFrame` stops the scan without error: more data may still arrive.
    pub fn parse_frames<'b>(
        ring: &mut RingBuffer<'b>,
        mut callback: impl FnMut(&FrameDescriptor<'_, 'b>),
    ) -> usize {
        let mut delivered = 0;

        loop {
            if ring.used() < MIN_FRAME_SIZE {
                break;
            }

            match Self::scan_for_preamble(ring) {
                Some(skip) => {
                    // advance_consume cannot fail here: skip <= used() by construction.
                    let _ = ring.advance_consume(skip);
                }
                None => {
                    // no 2-byte match remains possible; keep at most the trailing byte, which
                    // might be the first half of a preamble split across a future append.
                    let used = ring.used();
                    let _ = ring.advance_consume(used.saturating_sub(1));
                    break;
                }
            }

            match Self::parse_frame(ring) {
                Ok(descriptor) => {
                    callback(&descriptor);
                    delivered += 1;
                }
                Err(Error::IncompleteFrame) => break,
                Err(_) => {
                    // invalid_preamble is unreachable here (we just scanned to a match), but
                    // invalid_header_crc and invalid_payload_crc land here. Slide by one byte.
                    let _ = ring.advance_consume(1);
                }
            }
        }

        delivered
    }

    /// Returns the number of bytes to skip to reach the first 2-byte preamble match within the
    /// currently available bytes, or `None` if no match is possible with what's available.
    fn scan_for_preamble(ring: &RingBuffer) -> Option<usize> {
        let used = ring.used();
        if used < 2 {
            return None;
        }
        for i in 0..=(used - 2) {
            // unwrap is sound: i and i + 1 are both < used by the loop bound.
            if ring.peek_byte(i).unwrap() == PREAMBLE[0]
                && ring.peek_byte(i + 1).unwrap() == PREAMBLE[1]
            {
                return Some(i);
            }
        }
        None
    }
}
