use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// The single protocol version this client speaks.
pub const PROTOCOL_VERSION: u8 = 1;

/// Header: version (1) + type (1) + payload length (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest payload a message may carry.
pub const MAX_PAYLOAD_SIZE: usize = 2048;

/// Largest complete message: header plus maximum payload.
pub const MAX_MESSAGE_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Fixed 4-byte message header.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────┬──────────────┬──────────────────────┐
/// │ Version   │ Type     │ Length       │ Payload              │
/// │ (1B)      │ (1B)     │ (2B LE)      │ (Length bytes)       │
/// │ 0x01      │          │              │                      │
/// └───────────┴──────────┴──────────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u8,
    pub msg_type: u8,
    pub payload_length: u16,
}

impl MessageHeader {
    /// Header for the current protocol version.
    pub fn new(msg_type: u8, payload_length: u16) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            msg_type,
            payload_length,
        }
    }

    /// Read the first four bytes of `src` as a header without validating it.
    pub fn parse(src: &[u8]) -> Result<Self> {
        match src {
            [version, msg_type, lo, hi, ..] => Ok(Self {
                version: *version,
                msg_type: *msg_type,
                payload_length: u16::from_le_bytes([*lo, *hi]),
            }),
            _ => Err(FrameError::IncompleteHeader { len: src.len() }),
        }
    }

    /// Wire bytes of this header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [lo, hi] = self.payload_length.to_le_bytes();
        [self.version, self.msg_type, lo, hi]
    }

    /// A header is valid when it carries the supported protocol version.
    pub fn is_valid(&self) -> bool {
        self.version == PROTOCOL_VERSION
    }

    /// Total wire size of the message this header announces.
    pub fn message_len(&self) -> usize {
        HEADER_SIZE + self.payload_length as usize
    }
}

/// A decoded message: header plus exactly `payload_length` payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub payload: Bytes,
}

impl Message {
    /// Build a message, rejecting payloads over [`MAX_PAYLOAD_SIZE`].
    pub fn new(msg_type: u8, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        check_payload_len(payload.len())?;
        Ok(Self {
            header: MessageHeader::new(msg_type, payload.len() as u16),
            payload,
        })
    }

    /// The message type byte.
    pub fn msg_type(&self) -> u8 {
        self.header.msg_type
    }

    /// The total wire size of this message (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode this message back into wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);
        dst.freeze()
    }
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

/// Encode a message into a fresh buffer.
pub fn encode(msg_type: u8, payload: &[u8]) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    encode_into(msg_type, payload, &mut dst)?;
    Ok(dst.freeze())
}

/// Append an encoded message to `dst`.
pub fn encode_into(msg_type: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    check_payload_len(payload.len())?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(PROTOCOL_VERSION);
    dst.put_u8(msg_type);
    dst.put_u16_le(payload.len() as u16);
    dst.put_slice(payload);
    Ok(())
}

/// Decode one message from the start of `src`.
///
/// Returns the header and the exact payload slice; bytes after the message
/// are ignored.
pub fn decode(src: &[u8]) -> Result<(MessageHeader, &[u8])> {
    let header = MessageHeader::parse(src)?;
    if !header.is_valid() {
        return Err(FrameError::InvalidVersion(header.version));
    }

    let expected = header.message_len();
    if src.len() < expected {
        return Err(FrameError::IncompleteMessage {
            expected,
            actual: src.len(),
        });
    }

    Ok((header, &src[HEADER_SIZE..expected]))
}
