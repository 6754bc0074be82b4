use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{WIFI_SCAN_REQUEST, WIFI_SCAN_RESULT};

use crate::enums::SecurityType;
use crate::error::{ensure_len, Result};
use crate::record::{ScanEntry, WireRecord};
use crate::wire::{get_array, get_bool, get_text, put_bool, put_text};

const SSID_WIDTH: usize = 33;

/// One access point seen by a WiFi scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiNetwork {
    pub ssid: String,
    pub bssid: [u8; 6],
    pub rssi: i8,
    pub channel: u8,
    pub security: SecurityType,
    pub hidden: bool,
}

impl WireRecord for WifiNetwork {
    const NAME: &'static str = "wifi network";
    const SIZE: usize = 43;

    fn pack_into(&self, dst: &mut BytesMut) {
        put_text(dst, &self.ssid, SSID_WIDTH);
        dst.put_slice(&self.bssid);
        dst.put_i8(self.rssi);
        dst.put_u8(self.channel);
        dst.put_u8(self.security.into());
        put_bool(dst, self.hidden);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];
        Ok(Self {
            ssid: get_text(&mut src, SSID_WIDTH),
            bssid: get_array(&mut src),
            rssi: src.get_i8(),
            channel: src.get_u8(),
            security: SecurityType::from(src.get_u8()),
            hidden: get_bool(&mut src),
        })
    }
}

impl ScanEntry for WifiNetwork {
    const MAX_ENTRIES: usize = 32;
    const REQUEST_TYPE: u8 = WIFI_SCAN_REQUEST;
    const RESULT_TYPE: u8 = WIFI_SCAN_RESULT;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WifiNetwork {
        WifiNetwork {
            ssid: "CoffeeShop".into(),
            bssid: [0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x33],
            rssi: -61,
            channel: 11,
            security: SecurityType::Wpa2,
            hidden: false,
        }
    }

    #[test]
    fn layout_matches_device() {
        let wire = sample().pack();
        assert_eq!(wire.len(), 43);
        assert_eq!(&wire[..10], b"CoffeeShop");
        assert!(wire[10..33].iter().all(|b| *b == 0));
        assert_eq!(&wire[33..39], &[0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x33]);
        assert_eq!(wire[39] as i8, -61);
        assert_eq!(&wire[40..43], &[11, 3, 0]);
    }

    #[test]
    fn long_ssid_keeps_thirty_two_bytes() {
        let network = WifiNetwork {
            ssid: "x".repeat(40),
            ..sample()
        };
        let decoded = WifiNetwork::unpack(&network.pack()).unwrap();
        assert_eq!(decoded.ssid, "x".repeat(32));
    }

    #[test]
    fn unknown_security_byte_does_not_leak_into_neighbours() {
        let mut wire = sample().pack().to_vec();
        wire[41] = 0x7F;
        let decoded = WifiNetwork::unpack(&wire).unwrap();
        assert_eq!(decoded.security, SecurityType::Unknown);
        assert_eq!(decoded.channel, 11);
        assert!(!decoded.hidden);
    }
}
