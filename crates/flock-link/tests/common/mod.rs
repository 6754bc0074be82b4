//! A scripted stand-in for a Flock Bridge on a unix socket.

#![allow(dead_code)]

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use flock_frame::message_type::{
    ERROR, HEARTBEAT, IR_STROBE_TX, LF_PROBE_TX, STATUS_REQUEST, STATUS_RESPONSE,
    SUBGHZ_SCAN_REQUEST, SUBGHZ_SCAN_RESULT, WIFI_SCAN_REQUEST, WIFI_SCAN_RESULT,
};
use flock_frame::{Message, StreamFramer};
use flock_records::{
    DeviceError, DeviceStatus, ErrorCode, RequestPayload, SecurityType, SubGhzScanReport,
    SubGhzScanRequest, WifiNetwork, WifiScanReport, WireRecord,
};
use parking_lot::Mutex;

type Responder = dyn Fn(&Message) -> Vec<Vec<u8>> + Send + Sync;

/// Encode one message for the wire.
pub fn frame(msg_type: u8, payload: &[u8]) -> Vec<u8> {
    flock_frame::encode(msg_type, payload)
        .expect("test payload should fit")
        .to_vec()
}

pub fn sample_status() -> DeviceStatus {
    DeviceStatus {
        protocol_version: 1,
        wifi_board_connected: true,
        subghz_ready: true,
        ble_ready: true,
        ir_ready: false,
        nfc_ready: true,
        battery_percent: 87,
        uptime_seconds: 3600,
        wifi_scan_count: 12,
        ..DeviceStatus::default()
    }
}

pub fn sample_network() -> WifiNetwork {
    WifiNetwork {
        ssid: "Flock-Safety".into(),
        bssid: [0xAA, 0xBB, 0xCC, 0x01, 0x02, 0x03],
        rssi: -61,
        channel: 6,
        security: SecurityType::from(3),
        hidden: false,
    }
}

/// Answers the way the firmware does: heartbeats are echoed, status is
/// answered directly, scans are acknowledged and then reported, the LF probe
/// is acknowledged and the IR strobe is refused as busy. Anything else gets
/// no answer.
pub fn bridge(request: &Message) -> Vec<Vec<u8>> {
    match request.msg_type() {
        HEARTBEAT => vec![frame(HEARTBEAT, &[])],
        STATUS_REQUEST => vec![frame(STATUS_RESPONSE, &sample_status().pack())],
        WIFI_SCAN_REQUEST => vec![
            frame(HEARTBEAT, &[]),
            frame(
                WIFI_SCAN_RESULT,
                &WifiScanReport::new(1_700_000_000, vec![sample_network()]).encode(),
            ),
        ],
        SUBGHZ_SCAN_REQUEST => {
            let band = SubGhzScanRequest::decode(&request.payload).unwrap_or_default();
            let report = SubGhzScanReport {
                timestamp: 42,
                frequency_start: band.frequency_start,
                frequency_end: band.frequency_end,
                detections: Vec::new(),
            };
            vec![frame(HEARTBEAT, &[]), frame(SUBGHZ_SCAN_RESULT, &report.encode())]
        }
        LF_PROBE_TX => vec![frame(HEARTBEAT, &[])],
        IR_STROBE_TX => vec![frame(
            ERROR,
            &DeviceError::new(ErrorCode::Busy, "ir busy").encode(),
        )],
        _ => Vec::new(),
    }
}

pub fn silent(_: &Message) -> Vec<Vec<u8>> {
    Vec::new()
}

pub struct FakeDevice {
    dir: PathBuf,
    path: PathBuf,
    stop: Arc<AtomicBool>,
    hang_up: Arc<AtomicBool>,
    stalled: Arc<AtomicBool>,
    outbox: Sender<Vec<u8>>,
    requests: Arc<Mutex<Vec<u8>>>,
    accepted: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl FakeDevice {
    pub fn spawn<F>(tag: &str, responder: F) -> Self
    where
        F: Fn(&Message) -> Vec<Vec<u8>> + Send + Sync + 'static,
    {
        let dir = PathBuf::from(format!(
            "/tmp/flk-{}-{}-{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        let path = dir.join("dev.sock");
        let listener = UnixListener::bind(&path).expect("fake device should bind");
        listener
            .set_nonblocking(true)
            .expect("listener should go nonblocking");

        let (outbox, inbox) = crossbeam_channel::unbounded();
        let ctx = ServeContext {
            stop: Arc::new(AtomicBool::new(false)),
            hang_up: Arc::new(AtomicBool::new(false)),
            stalled: Arc::new(AtomicBool::new(false)),
            inbox,
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
        };
        let accepted = Arc::new(AtomicUsize::new(0));
        let stop = Arc::clone(&ctx.stop);
        let hang_up = Arc::clone(&ctx.hang_up);
        let stalled = Arc::clone(&ctx.stalled);
        let requests = Arc::clone(&ctx.requests);
        let accept_count = Arc::clone(&accepted);

        let thread = thread::spawn(move || {
            while !ctx.stop.load(Ordering::Acquire) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        accept_count.fetch_add(1, Ordering::SeqCst);
                        ctx.serve(stream);
                    }
                    Err(err) if err.kind() == ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            dir,
            path,
            stop,
            hang_up,
            stalled,
            outbox,
            requests,
            accepted,
            thread: Some(thread),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write bytes to the connected client unprompted.
    pub fn push(&self, bytes: Vec<u8>) {
        self.outbox.send(bytes).expect("device thread should be running");
    }

    /// Close the current client connection from the device side.
    pub fn hang_up(&self) {
        self.hang_up.store(true, Ordering::Release);
    }

    /// Stop reading from the client while keeping the socket open, so its
    /// writes back up once the socket buffers fill.
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.stalled.store(false, Ordering::Release);
    }

    /// Types of every message the device has received so far.
    pub fn requests(&self) -> Vec<u8> {
        self.requests.lock().clone()
    }

    pub fn connections(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

struct ServeContext {
    stop: Arc<AtomicBool>,
    hang_up: Arc<AtomicBool>,
    stalled: Arc<AtomicBool>,
    inbox: Receiver<Vec<u8>>,
    requests: Arc<Mutex<Vec<u8>>>,
    responder: Arc<Responder>,
}

impl ServeContext {
    fn serve(&self, mut stream: UnixStream) {
        stream
            .set_nonblocking(false)
            .expect("accepted stream should go blocking");
        stream
            .set_read_timeout(Some(Duration::from_millis(5)))
            .expect("read timeout should apply");
        let mut framer = StreamFramer::new();
        let mut buf = [0u8; 4096];

        loop {
            if self.stop.load(Ordering::Acquire) || self.hang_up.swap(false, Ordering::AcqRel) {
                return;
            }
            if self.stalled.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(5));
                continue;
            }
            while let Ok(bytes) = self.inbox.try_recv() {
                if stream.write_all(&bytes).is_err() {
                    return;
                }
            }
            match stream.read(&mut buf) {
                Ok(0) => return,
                Ok(n) => {
                    for message in framer.push(&buf[..n]) {
                        self.requests.lock().push(message.msg_type());
                        for reply in (self.responder)(&message) {
                            if stream.write_all(&reply).is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(_) => return,
            }
        }
    }
}

/// Poll `condition` until it holds or `limit` passes.
pub fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
