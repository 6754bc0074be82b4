//! Byte-stream links to a Flock Bridge device.
//!
//! Provides a unified [`LinkStream`] over the local mechanisms a device can be
//! reached through:
//! - USB CDC serial ports (`/dev/ttyACM*`, `/dev/cu.usbmodem*`)
//! - Unix domain sockets (serial bridges such as `socat`, and test fixtures)
//!
//! This is the lowest layer. Endpoint discovery by USB vendor/product id or
//! description lives in [`discovery`].

pub mod discovery;
pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod serial;

pub use discovery::{find_endpoint, list_endpoints, select_endpoint, DeviceMatcher, EndpointInfo};
pub use error::{Result, TransportError};
pub use stream::LinkStream;

#[cfg(unix)]
pub use serial::{SerialPort, SerialSettings};
