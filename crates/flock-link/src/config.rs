use std::path::PathBuf;
use std::time::Duration;

use flock_frame::FramerConfig;
use flock_transport::{DeviceMatcher, SerialSettings};

/// Default delivery queue bound.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Connection behavior configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Explicit endpoint; takes precedence over discovery. Default: none.
    pub endpoint: Option<PathBuf>,
    /// How to recognise a device during discovery.
    pub matcher: DeviceMatcher,
    /// Line settings for serial endpoints.
    pub serial: SerialSettings,
    /// How long one reader iteration waits for bytes. Default: 10 ms.
    pub poll_interval: Duration,
    /// Bound on waiting for the reader to exit on disconnect. Default: 2 s.
    pub stop_timeout: Duration,
    /// Drop the link after a failed write so the next `connect` reopens it.
    /// Default: true.
    pub auto_reconnect: bool,
    /// Delivery queue bound; the oldest message is dropped on overflow.
    /// Default: 256.
    pub queue_capacity: usize,
    /// Wait used by [`Connection::next_message`](crate::Connection::next_message).
    /// Default: 1 s.
    pub receive_timeout: Duration,
    pub framer: FramerConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            matcher: DeviceMatcher::default(),
            serial: SerialSettings::default(),
            poll_interval: Duration::from_millis(10),
            stop_timeout: Duration::from_secs(2),
            auto_reconnect: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            receive_timeout: Duration::from_secs(1),
            framer: FramerConfig::default(),
        }
    }
}

impl ConnectionConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<PathBuf>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_matcher(mut self, matcher: DeviceMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.serial.baud_rate = baud_rate;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    pub fn with_framer(mut self, framer: FramerConfig) -> Self {
        self.framer = framer;
        self
    }

    /// Reader poll interval, never zero (a zero socket timeout means "block forever").
    pub(crate) fn effective_poll_interval(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConnectionConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.stop_timeout, Duration::from_secs(2));
        assert!(config.auto_reconnect);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.framer.capacity, 4 * flock_frame::MAX_MESSAGE_SIZE);
    }

    #[test]
    fn builder_setters() {
        let config = ConnectionConfig::default()
            .with_endpoint("/dev/ttyACM0")
            .with_baud_rate(230_400)
            .with_auto_reconnect(false)
            .with_queue_capacity(4)
            .with_poll_interval(Duration::ZERO);
        assert_eq!(config.endpoint.as_deref(), Some(std::path::Path::new("/dev/ttyACM0")));
        assert_eq!(config.serial.baud_rate, 230_400);
        assert!(!config.auto_reconnect);
        assert_eq!(config.queue_capacity, 4);
        assert_eq!(config.effective_poll_interval(), Duration::from_millis(1));
    }
}
