//! Request/response operations on top of a [`Connection`].
//!
//! Every operation is a composition of [`Client::call`] or
//! [`Client::send_message`]:
//! - status and scans wait for their result type; the device's interim
//!   `HEARTBEAT` acknowledgement of a scan is skipped like any other message
//! - active probes wait for the `HEARTBEAT` acknowledgement
//! - configuration messages are not acknowledged and are only sent

use std::time::{Duration, Instant};

use flock_frame::message_type::{
    ERROR, HEARTBEAT, STATUS_REQUEST, STATUS_RESPONSE, SUBGHZ_SCAN_RESULT,
};
use flock_frame::{message_type_name, Message};
use flock_records::{
    BleActiveScan, BleDevice, BleScanReport, DeviceError, DeviceStatus, IrConfig, IrDetection,
    IrScanReport, IrStrobe, LfProbe, NfcDetection, NfcScanReport, Nrf24Config, RequestPayload,
    ScanEntry, ScanReport, SubGhzConfig, SubGhzScanReport, SubGhzScanRequest, WifiNetwork,
    WifiProbe, WifiScanReport, WireRecord, ZigbeeBeacon,
};
use tracing::{debug, trace};

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::{LinkError, Result};

/// Default wait for `ping`.
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);
/// Default wait for `status`.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);
/// Default wait for a scan result.
pub const SCAN_TIMEOUT: Duration = Duration::from_secs(10);
/// Default wait for a probe acknowledgement.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest single queue wait inside `collect`.
const COLLECT_SLICE: Duration = Duration::from_millis(500);

/// Typed request/response client for one device.
#[derive(Debug)]
pub struct Client {
    connection: Connection,
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Open a connection with `config` and wrap it.
    pub fn open(config: ConnectionConfig) -> Result<Self> {
        Connection::open(config).map(Self::new)
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn into_connection(self) -> Connection {
        self.connection
    }

    /// Send a message without waiting for anything.
    pub fn send_message(&self, msg_type: u8, payload: &[u8]) -> Result<()> {
        self.connection.send_message(msg_type, payload)
    }

    /// Send a request and wait for a message of type `expected`.
    ///
    /// Messages already queued are discarded first, so unrelated traffic that
    /// arrived before the call is lost. While waiting, messages of any other
    /// type are skipped; an `ERROR` message fails the call with
    /// [`LinkError::Device`].
    pub fn call(
        &self,
        request_type: u8,
        payload: &[u8],
        expected: u8,
        timeout: Duration,
    ) -> Result<Message> {
        let stale = self.connection.drain_pending();
        if stale > 0 {
            debug!(stale, "discarded queued messages before call");
        }

        self.connection.send_message(request_type, payload)?;

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(LinkError::ResponseTimeout(timeout));
            }
            let Some(message) = self.connection.receive(remaining) else {
                return Err(LinkError::ResponseTimeout(timeout));
            };

            match message.msg_type() {
                msg_type if msg_type == expected => return Ok(message),
                ERROR => return Err(DeviceError::decode(&message.payload).into()),
                other => trace!(
                    skipped = message_type_name(other),
                    waiting_for = message_type_name(expected),
                    "skipping message"
                ),
            }
        }
    }

    /// Heartbeat round trip. Timeouts and link errors both yield false.
    pub fn ping(&self, timeout: Duration) -> bool {
        match self.call(HEARTBEAT, &[], HEARTBEAT, timeout) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "ping failed");
                false
            }
        }
    }

    pub fn status(&self, timeout: Duration) -> Result<DeviceStatus> {
        let response = self.call(STATUS_REQUEST, &[], STATUS_RESPONSE, timeout)?;
        Ok(DeviceStatus::unpack(&response.payload)?)
    }

    /// Run a scan whose request carries no parameters.
    pub fn scan<T: ScanEntry>(&self, timeout: Duration) -> Result<ScanReport<T>> {
        let response = self.call(T::REQUEST_TYPE, &[], T::RESULT_TYPE, timeout)?;
        Ok(ScanReport::decode(&response.payload)?)
    }

    pub fn wifi_scan(&self, timeout: Duration) -> Result<WifiScanReport> {
        self.scan::<WifiNetwork>(timeout)
    }

    pub fn ble_scan(&self, timeout: Duration) -> Result<BleScanReport> {
        self.scan::<BleDevice>(timeout)
    }

    pub fn ir_scan(&self, timeout: Duration) -> Result<IrScanReport> {
        self.scan::<IrDetection>(timeout)
    }

    pub fn nfc_scan(&self, timeout: Duration) -> Result<NfcScanReport> {
        self.scan::<NfcDetection>(timeout)
    }

    pub fn subghz_scan(
        &self,
        request: &SubGhzScanRequest,
        timeout: Duration,
    ) -> Result<SubGhzScanReport> {
        let response = self.call(
            SubGhzScanRequest::MSG_TYPE,
            &request.encode(),
            SUBGHZ_SCAN_RESULT,
            timeout,
        )?;
        Ok(SubGhzScanReport::decode(&response.payload)?)
    }

    /// Send an active probe and wait for the device's acknowledgement.
    pub fn probe<P: RequestPayload>(&self, probe: &P, timeout: Duration) -> Result<()> {
        self.call(P::MSG_TYPE, &probe.encode(), HEARTBEAT, timeout)
            .map(drop)
    }

    pub fn lf_probe(&self, probe: &LfProbe, timeout: Duration) -> Result<()> {
        self.probe(probe, timeout)
    }

    pub fn ir_strobe(&self, strobe: &IrStrobe, timeout: Duration) -> Result<()> {
        self.probe(strobe, timeout)
    }

    pub fn wifi_probe(&self, probe: &WifiProbe, timeout: Duration) -> Result<()> {
        self.probe(probe, timeout)
    }

    pub fn ble_active_scan(&self, scan: &BleActiveScan, timeout: Duration) -> Result<()> {
        self.probe(scan, timeout)
    }

    pub fn zigbee_beacon(&self, beacon: &ZigbeeBeacon, timeout: Duration) -> Result<()> {
        self.probe(beacon, timeout)
    }

    /// Send a configuration payload. The device does not acknowledge these.
    pub fn configure<P: RequestPayload>(&self, config: &P) -> Result<()> {
        self.send_message(P::MSG_TYPE, &config.encode())
    }

    pub fn configure_subghz(&self, config: &SubGhzConfig) -> Result<()> {
        self.configure(config)
    }

    pub fn configure_ir(&self, config: &IrConfig) -> Result<()> {
        self.configure(config)
    }

    pub fn configure_nrf24(&self, config: &Nrf24Config) -> Result<()> {
        self.configure(config)
    }

    /// Everything delivered during `window`, in receipt order.
    pub fn collect(&self, window: Duration) -> Vec<Message> {
        let deadline = Instant::now() + window;
        let mut messages = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if let Some(message) = self.connection.receive(remaining.min(COLLECT_SLICE)) {
                messages.push(message);
            }
        }
        messages
    }
}

impl From<Connection> for Client {
    fn from(connection: Connection) -> Self {
        Self::new(connection)
    }
}
