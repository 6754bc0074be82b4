use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use flock_frame::{message_type_name, Message, MessageHeader, MessageWriter};
use flock_transport::{find_endpoint, LinkStream, TransportError};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ConnectionConfig;
use crate::error::{LinkError, Result};
use crate::listener::{ListenerId, ListenerResult, ListenerSet};
use crate::reader::ReaderHandle;

/// A link to one device with a background reader.
///
/// Decoded messages are delivered in receipt order to a bounded queue
/// (drained by [`receive`](Self::receive)) and to registered listeners.
/// Every method takes `&self`; share a connection across threads with `Arc`.
///
/// Listeners run on the reader thread and must return promptly. Dropping the
/// connection disconnects it.
pub struct Connection {
    shared: Arc<Shared>,
}

impl Connection {
    /// A disconnected connection.
    pub fn new(config: ConnectionConfig) -> Self {
        let (queue_tx, queue_rx) = crossbeam_channel::bounded(config.queue_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(LinkState::default()),
                listeners: ListenerSet::new(),
                queue_tx,
                queue_rx,
                config,
            }),
        }
    }

    /// Create and connect in one step.
    pub fn open(config: ConnectionConfig) -> Result<Self> {
        let connection = Self::new(config);
        connection.connect()?;
        Ok(connection)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.shared.config
    }

    /// Connect to the configured endpoint, or discover one.
    ///
    /// A no-op when already connected.
    pub fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        let endpoint = match &self.shared.config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => find_endpoint(&self.shared.config.matcher).ok_or(LinkError::DeviceNotFound)?,
        };
        self.connect_to(endpoint)
    }

    /// Connect to an explicit endpoint: a serial device node or a unix socket.
    ///
    /// A no-op when already connected, whatever the current endpoint is.
    pub fn connect_to(&self, endpoint: impl AsRef<Path>) -> Result<()> {
        let endpoint = endpoint.as_ref();
        let mut state = self.shared.state.lock();
        if state.session.is_some() {
            return Ok(());
        }

        let fail = |source: TransportError| LinkError::ConnectionFailed {
            endpoint: endpoint.to_path_buf(),
            source,
        };
        let stream = LinkStream::open(endpoint, &self.shared.config.serial).map_err(fail)?;
        let mut reader_stream = stream.try_clone().map_err(fail)?;
        reader_stream
            .set_read_timeout(Some(self.shared.config.effective_poll_interval()))
            .map_err(fail)?;

        state.generation += 1;
        let generation = state.generation;
        let kind = stream.kind();
        let reader = ReaderHandle::spawn(reader_stream, Arc::clone(&self.shared), generation)
            .map_err(|err| fail(TransportError::Io(err)))?;

        state.session = Some(Session {
            writer: Arc::new(Mutex::new(MessageWriter::new(stream))),
            endpoint: endpoint.to_path_buf(),
            reader,
            generation,
        });
        info!(?endpoint, kind, generation, "connected");
        Ok(())
    }

    /// Stop the reader and close the link. A no-op when not connected.
    ///
    /// Messages already queued stay available to [`receive`](Self::receive).
    pub fn disconnect(&self) {
        let session = self.shared.state.lock().session.take();
        if let Some(session) = session {
            self.shared.shutdown(session);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.lock().session.is_some()
    }

    /// Endpoint of the open link.
    pub fn endpoint(&self) -> Option<PathBuf> {
        self.shared
            .state
            .lock()
            .session
            .as_ref()
            .map(|session| session.endpoint.clone())
    }

    /// Write already-encoded bytes.
    ///
    /// A failed write is not retried. With `auto_reconnect` the link is
    /// dropped so that the next [`connect`](Self::connect) reopens it.
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        let (writer, generation) = {
            let state = self.shared.state.lock();
            let session = state.session.as_ref().ok_or(LinkError::NotConnected)?;
            (Arc::clone(&session.writer), session.generation)
        };

        let result = writer.lock().write_raw(bytes);
        if let Err(err) = result {
            error!(error = %err, generation, "send failed");
            if self.shared.config.auto_reconnect {
                self.shared.close_generation(generation);
            }
            return Err(LinkError::SendFailed(err));
        }
        Ok(())
    }

    /// Encode and write one message.
    pub fn send_message(&self, msg_type: u8, payload: &[u8]) -> Result<()> {
        let bytes = flock_frame::encode(msg_type, payload)?;
        debug!(
            msg_type = message_type_name(msg_type),
            len = payload.len(),
            "sending"
        );
        self.send(&bytes)
    }

    /// Wait up to `timeout` for the next delivered message.
    ///
    /// `None` means nothing arrived; it is not an error.
    pub fn receive(&self, timeout: Duration) -> Option<Message> {
        self.shared.queue_rx.recv_timeout(timeout).ok()
    }

    /// [`receive`](Self::receive) with the configured receive timeout.
    pub fn next_message(&self) -> Option<Message> {
        self.receive(self.shared.config.receive_timeout)
    }

    /// Discard every queued message, returning how many were dropped.
    pub fn drain_pending(&self) -> usize {
        self.shared.queue_rx.try_iter().count()
    }

    /// Number of messages waiting in the delivery queue.
    pub fn pending(&self) -> usize {
        self.shared.queue_rx.len()
    }

    /// Register a callback for every decoded message.
    ///
    /// Returned errors and panics are logged and otherwise ignored.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&MessageHeader, &[u8]) -> ListenerResult + Send + Sync + 'static,
    {
        self.shared.listeners.add(listener)
    }

    /// Returns false if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint())
            .field("pending", &self.pending())
            .field("listeners", &self.shared.listeners)
            .finish()
    }
}

/// State shared between the caller-facing [`Connection`] and its reader.
pub(crate) struct Shared {
    state: Mutex<LinkState>,
    listeners: ListenerSet,
    queue_tx: Sender<Message>,
    queue_rx: Receiver<Message>,
    pub(crate) config: ConnectionConfig,
}

#[derive(Default)]
struct LinkState {
    session: Option<Session>,
    /// Bumped on every open so a stale reader cannot close a newer link.
    generation: u64,
}

struct Session {
    writer: Arc<Mutex<MessageWriter<LinkStream>>>,
    endpoint: PathBuf,
    reader: ReaderHandle,
    generation: u64,
}

impl Shared {
    /// Queue a message, then run listeners. Called only by the reader.
    pub(crate) fn dispatch(&self, message: Message) {
        let header = message.header;
        let payload = message.payload.clone();
        debug!(
            msg_type = message_type_name(header.msg_type),
            len = payload.len(),
            "received"
        );
        self.enqueue(message);
        self.listeners.notify(&header, &payload);
    }

    fn enqueue(&self, mut message: Message) {
        loop {
            match self.queue_tx.try_send(message) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(dropped) = self.queue_rx.try_recv() {
                        warn!(
                            dropped = message_type_name(dropped.msg_type()),
                            capacity = self.config.queue_capacity,
                            "delivery queue full; dropped oldest message"
                        );
                    }
                    message = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Close link `generation` if it is still the open one.
    pub(crate) fn close_generation(&self, generation: u64) {
        let session = {
            let mut state = self.state.lock();
            match &state.session {
                Some(session) if session.generation == generation => state.session.take(),
                _ => None,
            }
        };
        if let Some(session) = session {
            self.shutdown(session);
        }
    }

    fn shutdown(&self, session: Session) {
        let Session {
            writer,
            endpoint,
            reader,
            generation,
        } = session;
        reader.stop(self.config.stop_timeout);
        drop(writer);
        info!(?endpoint, generation, "disconnected");
    }
}
