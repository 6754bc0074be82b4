use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::wire::truncate_utf8;

/// Longest message text a sender puts on the wire.
pub const MAX_ERROR_MESSAGE: usize = 64;

/// Protocol error codes reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    None,
    InvalidMessage,
    NotImplemented,
    HardwareFailure,
    Busy,
    Timeout,
    InvalidParameter,
    Other(u8),
}

impl From<u8> for ErrorCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::InvalidMessage,
            2 => Self::NotImplemented,
            3 => Self::HardwareFailure,
            4 => Self::Busy,
            5 => Self::Timeout,
            6 => Self::InvalidParameter,
            other => Self::Other(other),
        }
    }
}

impl From<ErrorCode> for u8 {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::None => 0,
            ErrorCode::InvalidMessage => 1,
            ErrorCode::NotImplemented => 2,
            ErrorCode::HardwareFailure => 3,
            ErrorCode::Busy => 4,
            ErrorCode::Timeout => 5,
            ErrorCode::InvalidParameter => 6,
            ErrorCode::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("NONE"),
            Self::InvalidMessage => f.write_str("INVALID_MSG"),
            Self::NotImplemented => f.write_str("NOT_IMPLEMENTED"),
            Self::HardwareFailure => f.write_str("HARDWARE_FAIL"),
            Self::Busy => f.write_str("BUSY"),
            Self::Timeout => f.write_str("TIMEOUT"),
            Self::InvalidParameter => f.write_str("INVALID_PARAM"),
            Self::Other(raw) => write!(f, "ERROR_{raw:#04x}"),
        }
    }
}

/// Payload of an `ERROR` message: one code byte followed by UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceError {
    pub code: ErrorCode,
    pub message: String,
}

impl DeviceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Encode, truncating the text to [`MAX_ERROR_MESSAGE`] bytes.
    pub fn encode(&self) -> Bytes {
        let text = truncate_utf8(&self.message, MAX_ERROR_MESSAGE);
        let mut dst = BytesMut::with_capacity(1 + text.len());
        dst.put_u8(self.code.into());
        dst.put_slice(text.as_bytes());
        dst.freeze()
    }

    /// Decode without assuming the sender truncated the text.
    ///
    /// An empty payload still reports an error: it decodes as
    /// [`ErrorCode::InvalidMessage`] with no text.
    pub fn decode(payload: &[u8]) -> Self {
        match payload.split_first() {
            Some((&code, text)) => Self {
                code: ErrorCode::from(code),
                message: String::from_utf8_lossy(text).into_owned(),
            },
            None => Self::new(ErrorCode::InvalidMessage, String::new()),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}
