//! Host-side client for the Flock Bridge Flipper Zero application.
//!
//! The device speaks a small binary protocol over USB CDC serial. This crate
//! bundles the layers that implement it:
//!
//! - [`transport`]: serial and unix-socket links, USB endpoint discovery
//! - [`frame`]: message header codec and resynchronizing stream framer
//! - [`records`]: fixed-layout payload records, scan reports, request payloads
//! - [`link`]: connection with background reader, request/response client
//!   (behind the `link` feature, on by default)

/// Re-export transport types.
pub mod transport {
    pub use flock_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use flock_frame::*;
}

/// Re-export record types.
pub mod records {
    pub use flock_records::*;
}

/// Re-export connection and client types (requires `link` feature).
#[cfg(feature = "link")]
pub mod link {
    pub use flock_link::*;
}

#[cfg(feature = "link")]
pub use flock_link::{Client, Connection, ConnectionConfig, LinkError};
