//! Device connection and request/response client.
//!
//! This is the "just works" layer. [`Connection`] opens a serial port (or a
//! unix socket standing in for one), runs a background reader that turns the
//! byte stream into messages, and hands them to a bounded queue and to
//! listeners. [`Client`] adds typed operations: ping, status, scans, probes
//! and configuration.
//!
//! ```no_run
//! use std::time::Duration;
//! use flock_link::{Client, ConnectionConfig};
//!
//! let client = Client::open(ConnectionConfig::default())?;
//! if client.ping(Duration::from_secs(2)) {
//!     let status = client.status(Duration::from_secs(5))?;
//!     println!("battery {}%", status.battery_percent);
//! }
//! # Ok::<(), flock_link::LinkError>(())
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod listener;

mod reader;

pub use client::{Client, PING_TIMEOUT, PROBE_TIMEOUT, SCAN_TIMEOUT, STATUS_TIMEOUT};
pub use config::{ConnectionConfig, DEFAULT_QUEUE_CAPACITY};
pub use connection::Connection;
pub use error::{LinkError, Result};
pub use listener::{ListenerId, ListenerResult};
