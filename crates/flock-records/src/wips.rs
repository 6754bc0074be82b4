use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use crate::enums::{AlertKind, Severity};
use crate::error::{ensure_len, Result};
use crate::record::WireRecord;
use crate::wire::{get_array, get_text, put_text};

const SSID_WIDTH: usize = 33;
const MAX_BSSIDS: usize = 4;
const DESCRIPTION_WIDTH: usize = 64;

/// Wireless intrusion alert pushed by the device without a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WipsAlert {
    pub timestamp: u32,
    pub kind: AlertKind,
    pub severity: Severity,
    pub ssid: String,
    /// Up to four hardware addresses involved in the alert.
    pub bssids: Vec<[u8; 6]>,
    pub description: String,
}

impl WireRecord for WipsAlert {
    const NAME: &'static str = "wips alert";
    const SIZE: usize = 128;

    fn pack_into(&self, dst: &mut BytesMut) {
        let count = self.bssids.len().min(MAX_BSSIDS);

        dst.put_u32_le(self.timestamp);
        dst.put_u8(self.kind.into());
        dst.put_u8(self.severity.into());
        put_text(dst, &self.ssid, SSID_WIDTH);
        dst.put_u8(count as u8);
        for bssid in &self.bssids[..count] {
            dst.put_slice(bssid);
        }
        dst.put_bytes(0, (MAX_BSSIDS - count) * 6);
        put_text(dst, &self.description, DESCRIPTION_WIDTH);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];

        let timestamp = src.get_u32_le();
        let kind = AlertKind::from(src.get_u8());
        let severity = Severity::from(src.get_u8());
        let ssid = get_text(&mut src, SSID_WIDTH);
        let count = usize::from(src.get_u8()).min(MAX_BSSIDS);
        let mut bssids = Vec::with_capacity(count);
        for slot in 0..MAX_BSSIDS {
            let bssid: [u8; 6] = get_array(&mut src);
            if slot < count {
                bssids.push(bssid);
            }
        }
        let description = get_text(&mut src, DESCRIPTION_WIDTH);

        Ok(Self {
            timestamp,
            kind,
            severity,
            ssid,
            bssids,
            description,
        })
    }
}
