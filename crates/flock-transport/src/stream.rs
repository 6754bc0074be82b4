use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

#[cfg(unix)]
use crate::serial::{SerialPort, SerialSettings};

/// A connected byte link to a device. Implements `Read` and `Write`.
///
/// This is the fundamental I/O type the connection layer works with.
/// A serial endpoint wraps a raw-mode tty; a unix-socket endpoint wraps a
/// stream socket (serial bridges, simulators and test fixtures).
pub struct LinkStream {
    inner: LinkStreamInner,
}

enum LinkStreamInner {
    #[cfg(unix)]
    Serial(SerialPort),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl LinkStream {
    /// Open an endpoint path.
    ///
    /// A path naming a unix socket is connected as a stream socket; anything
    /// else is opened as a serial device with `settings`.
    #[cfg(unix)]
    pub fn open(path: impl AsRef<Path>, settings: &SerialSettings) -> Result<Self> {
        use std::os::unix::fs::FileTypeExt;

        let path = path.as_ref();
        let is_socket = std::fs::metadata(path)
            .map(|meta| meta.file_type().is_socket())
            .unwrap_or(false);

        if is_socket {
            let stream = std::os::unix::net::UnixStream::connect(path).map_err(|source| {
                TransportError::Connect {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            stream.set_read_timeout(settings.read_timeout)?;
            stream.set_write_timeout(settings.write_timeout)?;
            debug!(?path, "connected unix-socket endpoint");
            return Ok(Self::from_unix(stream));
        }

        SerialPort::open(path, settings).map(Self::from_serial)
    }

    /// Wrap an already-open serial port.
    #[cfg(unix)]
    pub fn from_serial(port: SerialPort) -> Self {
        Self {
            inner: LinkStreamInner::Serial(port),
        }
    }

    /// Wrap an already-connected unix stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: LinkStreamInner::Unix(stream),
        }
    }

    /// Set read timeout on the underlying link.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => {
                port.set_read_timeout(timeout);
                Ok(())
            }
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Set write timeout on the underlying link.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => {
                port.set_write_timeout(timeout);
                Ok(())
            }
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
        }
    }

    /// Try to clone this link (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => Ok(Self::from_serial(port.try_clone()?)),
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => Ok(Self::from_unix(stream.try_clone()?)),
        }
    }

    /// Short name of the link kind, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match &self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(_) => "serial",
            #[cfg(unix)]
            LinkStreamInner::Unix(_) => "unix",
        }
    }
}

impl Read for LinkStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => port.read(buf),
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for LinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => port.write(buf),
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            LinkStreamInner::Serial(port) => port.flush(),
            #[cfg(unix)]
            LinkStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl std::fmt::Debug for LinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStream").field("type", &self.kind()).finish()
    }
}
