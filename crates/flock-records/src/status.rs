use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use crate::error::{ensure_len, Result};
use crate::record::WireRecord;
use crate::wire::{get_bool, put_bool};

/// Device status snapshot carried by `STATUS_RESPONSE`.
///
/// The device sends 23 bytes. Shorter payloads down to [`DeviceStatus::MIN_SIZE`]
/// are accepted; counters whose bytes are missing decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub protocol_version: u8,
    pub wifi_board_connected: bool,
    pub subghz_ready: bool,
    pub ble_ready: bool,
    pub ir_ready: bool,
    pub nfc_ready: bool,
    pub battery_percent: u8,
    pub uptime_seconds: u32,
    pub wifi_scan_count: u16,
    pub subghz_detection_count: u16,
    pub ble_scan_count: u16,
    pub ir_detection_count: u16,
    pub nfc_detection_count: u16,
    pub wips_alert_count: u16,
}

impl DeviceStatus {
    /// Fixed part every status payload carries: version, flags, battery,
    /// uptime and the first four counters.
    pub const MIN_SIZE: usize = 19;
}

impl WireRecord for DeviceStatus {
    const NAME: &'static str = "status";
    const SIZE: usize = 23;

    fn pack_into(&self, dst: &mut BytesMut) {
        dst.put_u8(self.protocol_version);
        put_bool(dst, self.wifi_board_connected);
        put_bool(dst, self.subghz_ready);
        put_bool(dst, self.ble_ready);
        put_bool(dst, self.ir_ready);
        put_bool(dst, self.nfc_ready);
        dst.put_u8(self.battery_percent);
        dst.put_u32_le(self.uptime_seconds);
        dst.put_u16_le(self.wifi_scan_count);
        dst.put_u16_le(self.subghz_detection_count);
        dst.put_u16_le(self.ble_scan_count);
        dst.put_u16_le(self.ir_detection_count);
        dst.put_u16_le(self.nfc_detection_count);
        dst.put_u16_le(self.wips_alert_count);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::MIN_SIZE)?;
        let mut src = &src[..src.len().min(Self::SIZE)];
        let mut status = Self {
            protocol_version: src.get_u8(),
            wifi_board_connected: get_bool(&mut src),
            subghz_ready: get_bool(&mut src),
            ble_ready: get_bool(&mut src),
            ir_ready: get_bool(&mut src),
            nfc_ready: get_bool(&mut src),
            battery_percent: src.get_u8(),
            uptime_seconds: src.get_u32_le(),
            wifi_scan_count: src.get_u16_le(),
            subghz_detection_count: src.get_u16_le(),
            ble_scan_count: src.get_u16_le(),
            ir_detection_count: src.get_u16_le(),
            ..Self::default()
        };
        if src.remaining() >= 2 {
            status.nfc_detection_count = src.get_u16_le();
        }
        if src.remaining() >= 2 {
            status.wips_alert_count = src.get_u16_le();
        }
        Ok(status)
    }
}
