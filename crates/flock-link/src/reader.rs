//! The background reader: one thread per open link.
//!
//! The thread owns the [`StreamFramer`]; nothing else touches its buffer.
//! It stops cooperatively: the stop flag is checked once per poll interval,
//! and the `done` channel disconnects when the thread exits (normally or by
//! panic), which is what [`ReaderHandle::stop`] waits on.

use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use flock_frame::StreamFramer;
use flock_transport::LinkStream;
use tracing::{debug, error, info, trace, warn};

use crate::connection::Shared;

const READ_CHUNK: usize = 1024;

pub(crate) struct ReaderHandle {
    stop: Arc<AtomicBool>,
    done: crossbeam_channel::Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

impl ReaderHandle {
    /// Start the reader for link `generation`.
    pub(crate) fn spawn(
        stream: LinkStream,
        shared: Arc<Shared>,
        generation: u64,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (done_tx, done) = crossbeam_channel::bounded(0);

        let worker = Reader {
            framer: StreamFramer::with_config(shared.config.framer.clone()),
            stream,
            shared,
            stop: Arc::clone(&stop),
            generation,
            _done: done_tx,
        };

        let thread = thread::Builder::new()
            .name(format!("flock-reader-{generation}"))
            .spawn(move || worker.run())?;

        Ok(Self {
            stop,
            done,
            thread: Some(thread),
        })
    }

    /// Signal the reader and wait up to `timeout` for it to exit.
    ///
    /// Returns false if the reader was still running when the wait ran out;
    /// it is then detached and exits on its next poll. Called from the reader
    /// thread itself (a listener disconnecting, or the reader's own error
    /// path), this only raises the flag.
    pub(crate) fn stop(mut self, timeout: Duration) -> bool {
        self.stop.store(true, Ordering::Release);

        let Some(thread) = self.thread.take() else {
            return true;
        };
        if thread.thread().id() == thread::current().id() {
            return true;
        }

        match self.done.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(?timeout, "reader did not stop in time; detaching");
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if thread.join().is_err() {
                    warn!("reader thread panicked");
                }
                true
            }
        }
    }
}

impl std::fmt::Debug for ReaderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderHandle")
            .field("stopping", &self.stop.load(Ordering::Relaxed))
            .finish()
    }
}

struct Reader {
    stream: LinkStream,
    framer: StreamFramer,
    shared: Arc<Shared>,
    stop: Arc<AtomicBool>,
    generation: u64,
    // Dropped when the thread exits, which wakes `ReaderHandle::stop`.
    _done: Sender<()>,
}

impl Reader {
    fn run(mut self) {
        debug!(generation = self.generation, "reader started");
        let mut chunk = [0u8; READ_CHUNK];

        while !self.stop.load(Ordering::Acquire) {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    info!(generation = self.generation, "link closed by device");
                    self.fail();
                    break;
                }
                Ok(n) => {
                    trace!(bytes = n, "read");
                    for message in self.framer.push(&chunk[..n]) {
                        self.shared.dispatch(message);
                    }
                }
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                    ) => {}
                Err(err) => {
                    error!(generation = self.generation, error = %err, "link read failed");
                    self.fail();
                    break;
                }
            }
        }

        self.framer.clear();
        debug!(generation = self.generation, "reader stopped");
    }

    /// Tear the link down unless a disconnect is already doing so.
    fn fail(&self) {
        if !self.stop.load(Ordering::Acquire) {
            self.shared.close_generation(self.generation);
        }
    }
}
