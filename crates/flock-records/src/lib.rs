//! Typed payloads for the Flock Bridge protocol.
//!
//! Every record has a constant wire size and explicit little-endian field
//! layout. Text fields are fixed-width UTF-8 blocks, truncated to one byte
//! less than their width and zero padded; decoding strips the padding and
//! replaces invalid UTF-8 instead of failing.

pub mod ble;
pub mod enums;
pub mod error;
pub mod error_payload;
pub mod ir;
pub mod nfc;
pub mod payload;
pub mod probe;
pub mod record;
pub mod report;
pub mod status;
pub mod subghz;
pub mod wifi;
pub mod wips;

mod wire;

pub use ble::BleDevice;
pub use enums::{AlertKind, Modulation, SecurityType, Severity};
pub use error::{RecordError, Result};
pub use error_payload::{DeviceError, ErrorCode, MAX_ERROR_MESSAGE};
pub use ir::IrDetection;
pub use nfc::NfcDetection;
pub use payload::Payload;
pub use probe::{
    BleActiveScan, IrConfig, IrStrobe, LfProbe, Nrf24Config, RequestPayload, SubGhzConfig,
    SubGhzScanRequest, WifiProbe, ZigbeeBeacon,
};
pub use record::{ScanEntry, WireRecord};
pub use report::{
    BleScanReport, IrScanReport, NfcScanReport, ScanReport, SubGhzScanReport, WifiScanReport,
};
pub use status::DeviceStatus;
pub use subghz::SubGhzDetection;
pub use wifi::WifiNetwork;
pub use wips::WipsAlert;
pub use wire::truncate_utf8;
