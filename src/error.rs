/// Failure modes for the frame codec.
///
/// A C implementation of this protocol reports these by value alongside a
/// `null_pointer` variant for bad caller pointers; a `&[u8]`/`&mut [u8]` can't be
/// null, so that variant has no Rust counterpart and is omitted rather than faked.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[non_exhaustive] // new errors may be added later
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A caller-provided output buffer (or backing storage) is smaller than required.
    BufferTooSmall,
    /// A ring-buffer `append` exceeded free space, or `consume` exceeded the bytes available.
    InsufficientSpace,
    /// A payload exceeds `MAX_PAYLOAD_SIZE`.
    PayloadTooLarge,
    /// Not enough bytes are available yet to parse a complete frame; supply more data and retry.
    IncompleteFrame,
    /// Bytes at the inspected origin do not match the frame preamble.
    InvalidPreamble,
    /// The header CRC did not match the computed CRC over the header fields.
    InvalidHeaderCrc,
    /// The payload CRC did not match the computed CRC over the payload bytes.
    InvalidPayloadCrc,
}

// std::error::Error isn't available in no_std; callers that need it can wrap
// this enum with their own error type once they're off the embedded target.
