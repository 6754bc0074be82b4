use bytes::Bytes;
use serde::Serialize;

use flock_frame::message_type::{
    BLE_SCAN_RESULT, ERROR, HEARTBEAT, IR_SCAN_RESULT, NFC_SCAN_RESULT, STATUS_RESPONSE,
    SUBGHZ_SCAN_RESULT, WIFI_SCAN_RESULT, WIPS_ALERT,
};
use flock_frame::Message;

use crate::error::Result;
use crate::error_payload::DeviceError;
use crate::record::WireRecord;
use crate::report::{BleScanReport, IrScanReport, NfcScanReport, SubGhzScanReport, WifiScanReport};
use crate::status::DeviceStatus;
use crate::wips::WipsAlert;

/// A device-to-host message payload interpreted by its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Heartbeat or acknowledgement.
    Empty,
    Status(DeviceStatus),
    WifiScan(WifiScanReport),
    SubGhzScan(SubGhzScanReport),
    BleScan(BleScanReport),
    IrScan(IrScanReport),
    NfcScan(NfcScanReport),
    WipsAlert(WipsAlert),
    Error(DeviceError),
    /// Any type without a typed decoder.
    Raw {
        msg_type: u8,
        #[serde(serialize_with = "serialize_hex")]
        bytes: Bytes,
    },
}

impl Payload {
    pub fn decode(msg_type: u8, payload: &[u8]) -> Result<Self> {
        Ok(match msg_type {
            HEARTBEAT => Self::Empty,
            STATUS_RESPONSE => Self::Status(DeviceStatus::unpack(payload)?),
            WIFI_SCAN_RESULT => Self::WifiScan(WifiScanReport::decode(payload)?),
            SUBGHZ_SCAN_RESULT => Self::SubGhzScan(SubGhzScanReport::decode(payload)?),
            BLE_SCAN_RESULT => Self::BleScan(BleScanReport::decode(payload)?),
            IR_SCAN_RESULT => Self::IrScan(IrScanReport::decode(payload)?),
            NFC_SCAN_RESULT => Self::NfcScan(NfcScanReport::decode(payload)?),
            WIPS_ALERT => Self::WipsAlert(WipsAlert::unpack(payload)?),
            ERROR => Self::Error(DeviceError::decode(payload)),
            other => Self::Raw {
                msg_type: other,
                bytes: Bytes::copy_from_slice(payload),
            },
        })
    }

    pub fn from_message(message: &Message) -> Result<Self> {
        Self::decode(message.msg_type(), &message.payload)
    }
}

fn serialize_hex<S: serde::Serializer>(bytes: &Bytes, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    serializer.serialize_str(&hex)
}
