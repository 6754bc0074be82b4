use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Line settings applied when a serial port is opened.
#[derive(Debug, Clone)]
pub struct SerialSettings {
    /// Baud rate. USB CDC ignores it, but real UART bridges do not. Default: 115200.
    pub baud_rate: u32,
    /// Upper bound for a single blocking read. `None` blocks until data arrives.
    pub read_timeout: Option<Duration>,
    /// Upper bound for a single blocking write. `None` blocks until the port accepts data.
    pub write_timeout: Option<Duration>,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            read_timeout: None,
            write_timeout: Some(Duration::from_secs(1)),
        }
    }
}

/// A raw-mode serial port (USB CDC ACM or UART) opened through termios.
///
/// The descriptor is opened non-blocking; reads and writes wait with `poll(2)`
/// so timeouts apply without touching `VMIN`/`VTIME`. A read that times out
/// fails with [`ErrorKind::TimedOut`]; a read returning `Ok(0)` means the
/// device hung up.
pub struct SerialPort {
    file: File,
    path: PathBuf,
    is_tty: bool,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl SerialPort {
    /// Open a device node and switch it to raw 8N1 at the configured speed.
    ///
    /// Nodes that are not terminals (FIFOs, character devices used in tests)
    /// are opened as-is without line configuration.
    pub fn open(path: impl AsRef<Path>, settings: &SerialSettings) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = baud_constant(settings.baud_rate)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;

        let is_tty =
            configure_raw(file.as_raw_fd(), speed).map_err(|source| TransportError::Configure {
                path: path.clone(),
                source,
            })?;

        if is_tty {
            info!(?path, baud = settings.baud_rate, "opened serial port");
        } else {
            debug!(?path, "opened non-terminal endpoint without line configuration");
        }

        Ok(Self {
            file,
            path,
            is_tty,
            read_timeout: settings.read_timeout,
            write_timeout: settings.write_timeout,
        })
    }

    /// Device node path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the upper bound for a single blocking read.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.read_timeout = timeout;
    }

    /// Set the upper bound for a single blocking write.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) {
        self.write_timeout = timeout;
    }

    /// Duplicate the descriptor so one handle can read while another writes.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            file: self.file.try_clone()?,
            path: self.path.clone(),
            is_tty: self.is_tty,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        })
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            if !wait_for(self.file.as_raw_fd(), libc::POLLIN, self.read_timeout)? {
                return Err(std::io::Error::from(ErrorKind::TimedOut));
            }
            match self.file.read(buf) {
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                other => return other,
            }
        }
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        loop {
            if !wait_for(self.file.as_raw_fd(), libc::POLLOUT, self.write_timeout)? {
                return Err(std::io::Error::from(ErrorKind::TimedOut));
            }
            match self.file.write(buf) {
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                other => return other,
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.is_tty {
            return self.file.flush();
        }
        // SAFETY: the descriptor is owned by `self.file` and open for the duration of the call.
        let rc = unsafe { libc::tcdrain(self.file.as_raw_fd()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("is_tty", &self.is_tty)
            .finish()
    }
}

fn baud_constant(baud_rate: u32) -> Result<libc::speed_t> {
    let speed = match baud_rate {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        other => return Err(TransportError::UnsupportedBaud(other)),
    };
    Ok(speed)
}

/// Put the terminal in raw mode. Returns `false` when `fd` is not a terminal.
fn configure_raw(fd: RawFd, speed: libc::speed_t) -> std::io::Result<bool> {
    // SAFETY: termios is plain old data; a zeroed value is only a placeholder
    // that tcgetattr overwrites before any field is read.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: `tio` is a valid, writable termios and `fd` is an open descriptor.
    if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ENOTTY) {
            return Ok(false);
        }
        return Err(err);
    }

    // SAFETY: `tio` was initialised by tcgetattr above.
    unsafe { libc::cfmakeraw(&mut tio) };
    tio.c_cflag |= libc::CLOCAL | libc::CREAD;
    tio.c_cc[libc::VMIN] = 1;
    tio.c_cc[libc::VTIME] = 0;

    // SAFETY: `tio` is a valid termios; the speed constant comes from libc.
    let speed_rc = unsafe { libc::cfsetispeed(&mut tio, speed) | libc::cfsetospeed(&mut tio, speed) };
    if speed_rc != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: `fd` is open and `tio` is fully initialised.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // Drop device chatter queued before we attached.
    // SAFETY: `fd` is an open terminal descriptor.
    unsafe { libc::tcflush(fd, libc::TCIOFLUSH) };

    Ok(true)
}

/// Wait until `fd` reports `events`. Returns `false` on timeout.
fn wait_for(fd: RawFd, events: libc::c_short, timeout: Option<Duration>) -> std::io::Result<bool> {
    let timeout_ms = match timeout {
        Some(timeout) => timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int,
        None => -1,
    };
    let mut pfd = libc::pollfd {
        fd,
        events,
        revents: 0,
    };

    loop {
        // SAFETY: `pfd` points to exactly one valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(rc > 0);
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    /// Allocate a pseudo-terminal pair; returns the master and the slave path.
    fn open_pty() -> (File, PathBuf) {
        use std::os::fd::FromRawFd;

        // SAFETY: plain libc calls on a freshly allocated master descriptor;
        // ptsname's static buffer is copied before any other pty call.
        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "posix_openpt should succeed");
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);
            let name = libc::ptsname(master);
            assert!(!name.is_null());
            let path = PathBuf::from(CStr::from_ptr(name).to_string_lossy().into_owned());
            (File::from_raw_fd(master), path)
        }
    }

    #[test]
    fn rejects_unsupported_baud() {
        let settings = SerialSettings {
            baud_rate: 12_345,
            ..SerialSettings::default()
        };
        let err = SerialPort::open("/dev/null", &settings).unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedBaud(12_345)));
    }

    #[test]
    fn missing_node_reports_open_error() {
        let err = SerialPort::open("/dev/flock-does-not-exist", &SerialSettings::default())
            .unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }

    #[test]
    fn non_terminal_opens_without_configuration() {
        let port = SerialPort::open("/dev/null", &SerialSettings::default()).unwrap();
        assert!(!port.is_tty);
        assert_eq!(port.path(), Path::new("/dev/null"));
    }

    #[test]
    fn pty_round_trip_in_raw_mode() {
        let (mut master, slave_path) = open_pty();
        let settings = SerialSettings {
            read_timeout: Some(Duration::from_secs(2)),
            ..SerialSettings::default()
        };
        let mut port = SerialPort::open(&slave_path, &settings).unwrap();
        assert!(port.is_tty);

        master.write_all(&[0x01, 0x00, 0x00, 0x00]).unwrap();
        let mut buf = [0u8; 16];
        let mut got = Vec::new();
        while got.len() < 4 {
            let n = port.read(&mut buf).unwrap();
            got.extend_from_slice(&buf[..n]);
        }
        assert_eq!(got, vec![0x01, 0x00, 0x00, 0x00]);

        port.write_all(b"\x01\x06\x00\x00").unwrap();
        let mut back = [0u8; 4];
        master.read_exact(&mut back).unwrap();
        assert_eq!(&back, b"\x01\x06\x00\x00");
    }

    #[test]
    fn read_times_out_without_data() {
        let (_master, slave_path) = open_pty();
        let settings = SerialSettings {
            read_timeout: Some(Duration::from_millis(20)),
            ..SerialSettings::default()
        };
        let mut port = SerialPort::open(&slave_path, &settings).unwrap();
        let mut buf = [0u8; 8];
        let err = port.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn cloned_handle_shares_the_line() {
        let (mut master, slave_path) = open_pty();
        let settings = SerialSettings {
            read_timeout: Some(Duration::from_secs(2)),
            ..SerialSettings::default()
        };
        let port = SerialPort::open(&slave_path, &settings).unwrap();
        let mut writer = port.try_clone().unwrap();

        writer.write_all(b"ok").unwrap();
        let mut back = [0u8; 2];
        master.read_exact(&mut back).unwrap();
        assert_eq!(&back, b"ok");
    }
}
