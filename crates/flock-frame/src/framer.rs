use bytes::{Buf, BytesMut};
use tracing::{debug, warn};

use crate::codec::{Message, MessageHeader, HEADER_SIZE, MAX_MESSAGE_SIZE, MAX_PAYLOAD_SIZE};

/// Default buffer bound: four maximum-size messages.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4 * MAX_MESSAGE_SIZE;

/// Configuration for the stream framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Upper bound on buffered, not-yet-extracted bytes. Default: 8208.
    pub capacity: usize,
    /// Declared payload lengths above this mark the header as corrupt. Default: 2048.
    pub max_payload_size: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_CAPACITY,
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

/// Reassembles messages from an arbitrarily chunked, possibly corrupted byte stream.
///
/// Resynchronization drops exactly one leading byte per corrupt header (wrong
/// version or oversized length) and re-checks, so a run of N garbage bytes
/// before a real message costs exactly N dropped bytes. A structurally valid
/// header whose payload has not fully arrived is kept intact until more bytes
/// are appended.
///
/// The buffer is bounded: when an append would exceed `capacity`, only the
/// most recent `capacity` bytes are kept. A producer that persistently outruns
/// extraction therefore loses its oldest backlog; memory stays bounded and
/// extraction always makes progress.
///
/// Only the version byte is checked. Any 4-byte window of noise that starts
/// with the version byte and declares a plausible length is accepted as a
/// header; the framing scheme has no checksum to tell the two apart.
pub struct StreamFramer {
    buf: BytesMut,
    config: FramerConfig,
    discarded: u64,
}

impl StreamFramer {
    /// Create a framer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.capacity.min(DEFAULT_BUFFER_CAPACITY)),
            config,
            discarded: 0,
        }
    }

    /// Append received bytes, trimming the oldest backlog past `capacity`.
    pub fn append(&mut self, chunk: &[u8]) {
        let capacity = self.config.capacity;

        if chunk.len() >= capacity {
            let dropped = self.buf.len() + chunk.len() - capacity;
            self.buf.clear();
            self.buf.extend_from_slice(&chunk[chunk.len() - capacity..]);
            self.note_overflow(dropped);
            return;
        }

        self.buf.extend_from_slice(chunk);
        if self.buf.len() > capacity {
            let dropped = self.buf.len() - capacity;
            self.buf.advance(dropped);
            self.note_overflow(dropped);
        }
    }

    /// Extract every complete message currently buffered, in stream order.
    pub fn extract_messages(&mut self) -> Vec<Message> {
        let mut messages = Vec::new();
        loop {
            let step = take_message(&mut self.buf, self.config.max_payload_size);
            if step.skipped > 0 {
                self.discarded += step.skipped as u64;
                debug!(skipped = step.skipped, "resynchronized past corrupt bytes");
            }
            match step.message {
                Some(message) => messages.push(message),
                None => break,
            }
        }
        messages
    }

    /// Append `chunk` and extract everything that became complete.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Message> {
        self.append(chunk);
        self.extract_messages()
    }

    /// Drop all buffered bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Number of buffered, not-yet-extracted bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Configured buffer bound.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Total bytes dropped by resynchronization and overflow trimming.
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    fn note_overflow(&mut self, dropped: usize) {
        self.discarded += dropped as u64;
        warn!(
            dropped,
            capacity = self.config.capacity,
            "frame buffer overflow, kept most recent bytes"
        );
    }
}

impl Default for StreamFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StreamFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFramer")
            .field("buffered", &self.buf.len())
            .field("capacity", &self.config.capacity)
            .field("discarded", &self.discarded)
            .finish()
    }
}

/// Outcome of one extraction attempt.
pub(crate) struct Extraction {
    pub message: Option<Message>,
    pub skipped: usize,
}

/// Pull at most one message off the front of `buf`, dropping corrupt lead bytes.
///
/// Stops without consuming anything further once a valid header is found
/// whose message is not yet complete.
pub(crate) fn take_message(buf: &mut BytesMut, max_payload: usize) -> Extraction {
    let mut skipped = 0usize;

    while buf.len() >= HEADER_SIZE {
        let header = match MessageHeader::parse(buf) {
            Ok(header) => header,
            Err(_) => break,
        };

        if !header.is_valid() || header.payload_length as usize > max_payload {
            buf.advance(1);
            skipped += 1;
            continue;
        }

        if buf.len() < header.message_len() {
            break;
        }

        buf.advance(HEADER_SIZE);
        let payload = buf.split_to(header.payload_length as usize).freeze();
        return Extraction {
            message: Some(Message { header, payload }),
            skipped,
        };
    }

    Extraction {
        message: None,
        skipped,
    }
}
