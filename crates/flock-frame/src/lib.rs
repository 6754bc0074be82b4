//! Message framing for the Flock Bridge serial protocol.
//!
//! Every message on the wire is a 4-byte little-endian header followed by
//! exactly `payload_length` payload bytes:
//! - 1-byte protocol version (must be [`PROTOCOL_VERSION`])
//! - 1-byte message type (see [`message_type`])
//! - 2-byte payload length (at most [`MAX_PAYLOAD_SIZE`])
//!
//! [`StreamFramer`] turns arbitrarily chunked, possibly corrupted input back
//! into whole messages. Callers never see a partial or misaligned message.

pub mod codec;
pub mod error;
pub mod framer;
pub mod message_type;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{
    decode, encode, encode_into, Message, MessageHeader, HEADER_SIZE, MAX_MESSAGE_SIZE,
    MAX_PAYLOAD_SIZE, PROTOCOL_VERSION,
};
pub use error::{FrameError, Result};
pub use framer::{FramerConfig, StreamFramer, DEFAULT_BUFFER_CAPACITY};
pub use message_type::message_type_name;
pub use writer::MessageWriter;

#[cfg(feature = "async")]
pub use async_codec::MessageCodec;
