//! Host-to-device request payloads: scan parameters, active probes and
//! passive scan configuration.
//!
//! Encoders clamp out-of-range parameters into the range the device accepts
//! instead of rejecting them.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{
    BLE_ACTIVE_SCAN, IR_CONFIG, IR_STROBE_TX, LF_PROBE_TX, NRF24_CONFIG, SUBGHZ_CONFIG,
    SUBGHZ_SCAN_REQUEST, WIFI_PROBE_TX, ZIGBEE_BEACON_TX,
};

use crate::error::{ensure_len, Result};
use crate::wire::{get_bool, put_bool, truncate_utf8};

/// A payload sent with a fixed request message type.
pub trait RequestPayload: Sized {
    const MSG_TYPE: u8;

    fn encode(&self) -> Bytes;

    fn decode(payload: &[u8]) -> Result<Self>;
}

/// Band to sweep for a Sub-GHz scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubGhzScanRequest {
    pub frequency_start: u32,
    pub frequency_end: u32,
}

impl Default for SubGhzScanRequest {
    fn default() -> Self {
        Self {
            frequency_start: 300_000_000,
            frequency_end: 928_000_000,
        }
    }
}

impl RequestPayload for SubGhzScanRequest {
    const MSG_TYPE: u8 = SUBGHZ_SCAN_REQUEST;

    fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(8);
        dst.put_u32_le(self.frequency_start);
        dst.put_u32_le(self.frequency_end);
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("subghz scan request", payload, 8)?;
        let mut src = payload;
        Ok(Self {
            frequency_start: src.get_u32_le(),
            frequency_end: src.get_u32_le(),
        })
    }
}

/// 125 kHz carrier burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LfProbe {
    pub duration_ms: u16,
}

impl LfProbe {
    pub const MIN_DURATION_MS: u16 = 100;
    pub const MAX_DURATION_MS: u16 = 5000;
}

impl Default for LfProbe {
    fn default() -> Self {
        Self { duration_ms: 1000 }
    }
}

impl RequestPayload for LfProbe {
    const MSG_TYPE: u8 = LF_PROBE_TX;

    fn encode(&self) -> Bytes {
        let duration = self
            .duration_ms
            .clamp(Self::MIN_DURATION_MS, Self::MAX_DURATION_MS);
        Bytes::copy_from_slice(&duration.to_le_bytes())
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("lf probe", payload, 2)?;
        Ok(Self {
            duration_ms: u16::from_le_bytes([payload[0], payload[1]]),
        })
    }
}

/// Infrared strobe at a low flash rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IrStrobe {
    /// 14 for high-priority, 10 for low-priority preemption.
    pub frequency_hz: u16,
    /// Percent, capped at 100.
    pub duty_cycle: u8,
    pub duration_ms: u16,
}

impl IrStrobe {
    pub const MIN_DURATION_MS: u16 = 100;
    pub const MAX_DURATION_MS: u16 = 10_000;
}

impl Default for IrStrobe {
    fn default() -> Self {
        Self {
            frequency_hz: 14,
            duty_cycle: 50,
            duration_ms: 1000,
        }
    }
}

impl RequestPayload for IrStrobe {
    const MSG_TYPE: u8 = IR_STROBE_TX;

    fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(5);
        dst.put_u16_le(self.frequency_hz);
        dst.put_u8(self.duty_cycle.min(100));
        dst.put_u16_le(
            self.duration_ms
                .clamp(Self::MIN_DURATION_MS, Self::MAX_DURATION_MS),
        );
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("ir strobe", payload, 5)?;
        let mut src = payload;
        Ok(Self {
            frequency_hz: src.get_u16_le(),
            duty_cycle: src.get_u8(),
            duration_ms: src.get_u16_le(),
        })
    }
}

/// Directed WiFi probe request for one SSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiProbe {
    pub ssid: String,
}

impl WifiProbe {
    pub const MAX_SSID: usize = 32;

    pub fn new(ssid: impl Into<String>) -> Self {
        Self { ssid: ssid.into() }
    }
}

impl RequestPayload for WifiProbe {
    const MSG_TYPE: u8 = WIFI_PROBE_TX;

    fn encode(&self) -> Bytes {
        let ssid = truncate_utf8(&self.ssid, Self::MAX_SSID);
        let mut dst = BytesMut::with_capacity(1 + ssid.len());
        dst.put_u8(ssid.len() as u8);
        dst.put_slice(ssid.as_bytes());
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("wifi probe", payload, 1)?;
        let len = usize::from(payload[0]);
        ensure_len("wifi probe", payload, 1 + len)?;
        Ok(Self {
            ssid: String::from_utf8_lossy(&payload[1..1 + len]).into_owned(),
        })
    }
}

/// Switch BLE scanning between active (scan requests sent) and passive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BleActiveScan {
    pub active: bool,
}

impl RequestPayload for BleActiveScan {
    const MSG_TYPE: u8 = BLE_ACTIVE_SCAN;

    fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(&[u8::from(self.active)])
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("ble active scan", payload, 1)?;
        let mut src = payload;
        Ok(Self {
            active: get_bool(&mut src),
        })
    }
}

/// Zigbee beacon request on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZigbeeBeacon {
    /// 11..=26, or 0 to hop across all channels.
    pub channel: u8,
}

impl RequestPayload for ZigbeeBeacon {
    const MSG_TYPE: u8 = ZIGBEE_BEACON_TX;

    fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(&[self.channel])
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("zigbee beacon", payload, 1)?;
        Ok(Self {
            channel: payload[0],
        })
    }
}

/// Passive Sub-GHz detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubGhzConfig {
    /// 0 TPMS, 1 P25, 2 LoJack, 3 pager, 4 power grid, 5 crane, 6 ESL, 7 thermal.
    pub probe_type: u8,
    /// Hz; 0 selects the probe type's default.
    pub frequency: u32,
    /// 0 ASK, 1 FSK, 2 GFSK.
    pub modulation: u8,
}

impl RequestPayload for SubGhzConfig {
    const MSG_TYPE: u8 = SUBGHZ_CONFIG;

    fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(6);
        dst.put_u8(self.probe_type);
        dst.put_u32_le(self.frequency);
        dst.put_u8(self.modulation);
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("subghz config", payload, 6)?;
        let mut src = payload;
        Ok(Self {
            probe_type: src.get_u8(),
            frequency: src.get_u32_le(),
            modulation: src.get_u8(),
        })
    }
}

/// Passive IR detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IrConfig {
    pub detect_opticom: bool,
}

impl RequestPayload for IrConfig {
    const MSG_TYPE: u8 = IR_CONFIG;

    fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(1);
        put_bool(&mut dst, self.detect_opticom);
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("ir config", payload, 1)?;
        let mut src = payload;
        Ok(Self {
            detect_opticom: get_bool(&mut src),
        })
    }
}

/// NRF24 promiscuous scan configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Nrf24Config {
    pub promiscuous: bool,
}

impl RequestPayload for Nrf24Config {
    const MSG_TYPE: u8 = NRF24_CONFIG;

    fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(1);
        put_bool(&mut dst, self.promiscuous);
        dst.freeze()
    }

    fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len("nrf24 config", payload, 1)?;
        let mut src = payload;
        Ok(Self {
            promiscuous: get_bool(&mut src),
        })
    }
}
