use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_into, Message, MAX_MESSAGE_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete messages to any `Write` stream.
///
/// Each message is encoded into a reused buffer and written in full before
/// the stream is flushed. Timeouts surface as [`FrameError::Io`] rather than
/// being retried, so a stalled device cannot block a sender forever.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> MessageWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_MESSAGE_SIZE),
        }
    }

    /// Encode and send one message.
    pub fn send(&mut self, msg_type: u8, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_into(msg_type, payload, &mut self.buf)?;
        write_fully(&mut self.inner, &self.buf)?;
        self.flush()
    }

    /// Write bytes that are already message-encoded.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        write_fully(&mut self.inner, bytes)?;
        self.flush()
    }

    /// Send an already-built message.
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send(message.msg_type(), message.payload.as_ref())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn write_fully<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

impl<T> std::fmt::Debug for MessageWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageWriter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::decode;
    use crate::framer::StreamFramer;
    use crate::message_type::{HEARTBEAT, STATUS_REQUEST, WIFI_SCAN_REQUEST};

    #[test]
    fn writes_heartbeat_bytes() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(HEARTBEAT, &[]).unwrap();
        assert_eq!(writer.into_inner().into_inner(), vec![0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn consecutive_messages_are_framed_in_order() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(STATUS_REQUEST, &[]).unwrap();
        writer.send(WIFI_SCAN_REQUEST, b"x").unwrap();
        let built = Message::new(0x42, &b"abc"[..]).unwrap();
        writer.write_message(&built).unwrap();

        let wire = writer.into_inner().into_inner();
        let messages = StreamFramer::new().push(&wire);

        let types: Vec<u8> = messages.iter().map(Message::msg_type).collect();
        assert_eq!(types, vec![STATUS_REQUEST, WIFI_SCAN_REQUEST, 0x42]);
        assert_eq!(messages[2].payload.as_ref(), b"abc");
    }

    #[test]
    fn oversized_payload_is_rejected_before_writing() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer.send(HEARTBEAT, &[0u8; 4096]).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = MessageWriter::new(sink);

        writer.send(HEARTBEAT, &[]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn retries_interrupted_write() {
        let mut writer = MessageWriter::new(InterruptedOnce {
            interrupted: false,
            data: Vec::new(),
        });
        writer.send(STATUS_REQUEST, b"retry").unwrap();

        let inner = writer.into_inner();
        let (header, payload) = decode(&inner.data).unwrap();
        assert_eq!(header.msg_type, STATUS_REQUEST);
        assert_eq!(payload, b"retry");
    }

    #[test]
    fn timeout_is_reported_not_retried() {
        let mut writer = MessageWriter::new(TimesOut);
        let err = writer.send(HEARTBEAT, &[]).unwrap_err();
        match err {
            FrameError::Io(io) => assert_eq!(io.kind(), ErrorKind::TimedOut),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn raw_bytes_are_written_verbatim() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_raw(&[0x01, 0x05, 0x00, 0x00]).unwrap();
        assert_eq!(writer.into_inner().into_inner(), vec![0x01, 0x05, 0x00, 0x00]);
    }

    #[test]
    fn zero_length_write_means_closed() {
        let mut writer = MessageWriter::new(ZeroWriter);
        let err = writer.send(HEARTBEAT, &[]).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedOnce {
        interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            // Short writes exercise the offset loop.
            let n = buf.len().min(3);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct TimesOut;

    impl Write for TimesOut {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::TimedOut))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
