use std::path::PathBuf;
use std::time::Duration;

use flock_records::ErrorCode;

/// Errors that can occur in connection and client operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No endpoint was given and discovery found no matching device.
    #[error("no Flock Bridge device found")]
    DeviceNotFound,

    /// The endpoint could not be opened.
    #[error("cannot connect to {endpoint}: {source}")]
    ConnectionFailed {
        endpoint: PathBuf,
        #[source]
        source: flock_transport::TransportError,
    },

    /// No open link.
    #[error("not connected")]
    NotConnected,

    /// Writing to the link failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] flock_frame::FrameError),

    /// The expected response did not arrive in time.
    #[error("no response within {0:?}")]
    ResponseTimeout(Duration),

    /// The device answered with an `ERROR` message.
    #[error("device error {code}: {message}")]
    Device { code: ErrorCode, message: String },

    /// A message could not be encoded.
    #[error("frame error: {0}")]
    Frame(#[from] flock_frame::FrameError),

    /// A response payload could not be decoded.
    #[error("record error: {0}")]
    Record(#[from] flock_records::RecordError),
}

impl From<flock_records::DeviceError> for LinkError {
    fn from(err: flock_records::DeviceError) -> Self {
        Self::Device {
            code: err.code,
            message: err.message,
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;
