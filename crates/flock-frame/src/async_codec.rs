//! `tokio_util::codec` adapter over the resynchronizing framer.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{encode_into, Message, MAX_PAYLOAD_SIZE};
use crate::error::FrameError;
use crate::framer::take_message;

/// Frames Flock Bridge messages for `FramedRead`/`FramedWrite`.
///
/// Decoding applies the same one-byte resynchronization as
/// [`StreamFramer`](crate::StreamFramer); corrupt bytes are skipped, never
/// reported as errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageCodec {
    _priv: (),
}

impl MessageCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for MessageCodec {
    type Item = Message;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, FrameError> {
        let step = take_message(src, MAX_PAYLOAD_SIZE);
        if step.skipped > 0 {
            debug!(skipped = step.skipped, "resynchronized past corrupt bytes");
        }
        Ok(step.message)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Message>, FrameError> {
        match self.decode(src)? {
            Some(message) => Ok(Some(message)),
            None => {
                if !src.is_empty() {
                    debug!(leftover = src.len(), "discarding partial message at end of stream");
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Message> for MessageCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_into(item.msg_type(), item.payload.as_ref(), dst)
    }
}
