/// Errors that can occur during message encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the protocol maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Fewer than four bytes were available for the header.
    #[error("incomplete header ({len} of 4 bytes)")]
    IncompleteHeader { len: usize },

    /// The header carries a protocol version this client does not speak.
    #[error("invalid protocol version {0:#04x}")]
    InvalidVersion(u8),

    /// The buffer ends before the declared payload does.
    #[error("incomplete message ({actual} of {expected} bytes)")]
    IncompleteMessage { expected: usize, actual: usize },

    /// An I/O error occurred while writing messages.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link accepted zero bytes mid-message.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
