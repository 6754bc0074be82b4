use std::fmt;
use std::io;

use flock_frame::FrameError;
use flock_link::LinkError;
use flock_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
/// The device answered with an `ERROR` message.
pub const DEVICE_ERROR: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        TransportError::Open { source, .. }
        | TransportError::Configure { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Enumerate(source)
        | TransportError::Io(source)
            if source.kind() == io::ErrorKind::PermissionDenied =>
        {
            PERMISSION_DENIED
        }
        TransportError::UnsupportedBaud(_) => USAGE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    let code = match &err {
        FrameError::Io(source) => io_code(source.kind()),
        FrameError::PayloadTooLarge { .. } => DATA_INVALID,
        FrameError::ConnectionClosed => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::DeviceNotFound => CliError::new(
            TRANSPORT_ERROR,
            format!("{context}: {err} (pass --port or set FLOCK_PORT)"),
        ),
        LinkError::ConnectionFailed { source, .. } => transport_error(context, source),
        LinkError::SendFailed(source) => frame_error(context, source),
        LinkError::Frame(source) => frame_error(context, source),
        LinkError::NotConnected => CliError::new(FAILURE, format!("{context}: {err}")),
        LinkError::ResponseTimeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        LinkError::Device { .. } => CliError::new(DEVICE_ERROR, format!("{context}: {err}")),
        LinkError::Record(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use flock_records::ErrorCode;

    use super::*;

    #[test]
    fn write_timeouts_and_oversize_payloads_have_distinct_codes() {
        let stalled = frame_error("send", FrameError::Io(io::ErrorKind::WouldBlock.into()));
        assert_eq!(stalled.code, TIMEOUT);

        let oversize = frame_error("send", FrameError::PayloadTooLarge { size: 4096, max: 2048 });
        assert_eq!(oversize.code, DATA_INVALID);
    }

    #[test]
    fn timeouts_map_to_124() {
        let err = link_error("status", LinkError::ResponseTimeout(Duration::from_secs(1)));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn missing_port_is_a_transport_error() {
        let err = link_error(
            "connect",
            LinkError::ConnectionFailed {
                endpoint: "/dev/ttyACM9".into(),
                source: TransportError::Open {
                    path: "/dev/ttyACM9".into(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                },
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("connect: "));
    }

    #[test]
    fn permission_denied_is_reported_as_such() {
        let err = transport_error(
            "connect",
            TransportError::Open {
                path: "/dev/ttyACM0".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn device_errors_keep_their_code_name() {
        let err = link_error(
            "probe",
            LinkError::Device {
                code: ErrorCode::Busy,
                message: "ir busy".into(),
            },
        );
        assert_eq!(err.code, DEVICE_ERROR);
        assert!(err.message.contains("BUSY"));
    }
}
