use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flock_frame::{message_type_name, MessageHeader};
use parking_lot::RwLock;
use tracing::warn;

/// What a listener reports back. Errors are logged by the reader and dropped.
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Callback = dyn Fn(&MessageHeader, &[u8]) -> ListenerResult + Send + Sync;

/// Handle returned by [`Connection::add_listener`](crate::Connection::add_listener).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Observer list invoked by the reader for every decoded message.
pub(crate) struct ListenerSet {
    entries: RwLock<Vec<(ListenerId, Arc<Callback>)>>,
    next_id: AtomicU64,
}

impl ListenerSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn add<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&MessageHeader, &[u8]) -> ListenerResult + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push((id, Arc::new(callback)));
        id
    }

    /// Returns false if `id` was not registered.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Invoke every listener in registration order.
    ///
    /// The list is snapshotted first so a listener may add or remove
    /// listeners without deadlocking. Failures never escape.
    pub(crate) fn notify(&self, header: &MessageHeader, payload: &[u8]) {
        let snapshot: Vec<(ListenerId, Arc<Callback>)> = self.entries.read().clone();

        for (id, callback) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(header, payload))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    listener = id.0,
                    msg_type = message_type_name(header.msg_type),
                    error = %err,
                    "listener failed"
                ),
                Err(panic) => warn!(
                    listener = id.0,
                    msg_type = message_type_name(header.msg_type),
                    panic = panic_message(panic.as_ref()),
                    "listener panicked"
                ),
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(text) = panic.downcast_ref::<&'static str>() {
        text
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.as_str()
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}
