#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
// this crate is intended for use in both hosted and embedded contexts. No allocations required.

pub mod builder;
pub mod codec;
pub mod crc;
pub mod error;
pub mod frame;
pub mod parser;
pub mod ring;

pub use builder::FrameBuilder;
pub use error::Error;
pub use frame::FrameDescriptor;
pub use parser::FrameParser;
pub use ring::RingBuffer;

type Result<T> = core::result::Result<T, error::Error>;
