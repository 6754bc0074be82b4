//! Scan result lists: a timestamp, a count, then `count` fixed-size entries.
//!
//! Decoding is lenient about the tail. When the payload ends before `count`
//! entries have been read, the entries parsed so far are returned. Only a
//! payload too short for the list prefix itself is an error.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use tracing::debug;

use flock_frame::MAX_PAYLOAD_SIZE;

use crate::ble::BleDevice;
use crate::error::{ensure_len, Result};
use crate::ir::IrDetection;
use crate::nfc::NfcDetection;
use crate::record::{ScanEntry, WireRecord};
use crate::subghz::SubGhzDetection;
use crate::wifi::WifiNetwork;

/// WiFi, BLE, IR and NFC result layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport<T> {
    pub timestamp: u32,
    pub entries: Vec<T>,
}

pub type WifiScanReport = ScanReport<WifiNetwork>;
pub type BleScanReport = ScanReport<BleDevice>;
pub type IrScanReport = ScanReport<IrDetection>;
pub type NfcScanReport = ScanReport<NfcDetection>;

const LIST_PREFIX: usize = 5;

impl<T: ScanEntry> ScanReport<T> {
    pub fn new(timestamp: u32, entries: Vec<T>) -> Self {
        Self { timestamp, entries }
    }

    /// Encode, keeping at most as many entries as the device reports and as
    /// fit in one message.
    pub fn encode(&self) -> Bytes {
        let count = entry_limit::<T>(LIST_PREFIX, self.entries.len());
        let mut dst = BytesMut::with_capacity(LIST_PREFIX + count * T::SIZE);
        dst.put_u32_le(self.timestamp);
        dst.put_u8(count as u8);
        for entry in &self.entries[..count] {
            entry.pack_into(&mut dst);
        }
        dst.freeze()
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len(T::NAME, payload, LIST_PREFIX)?;
        let mut src = payload;
        let timestamp = src.get_u32_le();
        let count = usize::from(src.get_u8());
        Ok(Self {
            timestamp,
            entries: decode_entries(src, count)?,
        })
    }
}

/// Sub-GHz result layout, which also carries the swept band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubGhzScanReport {
    pub timestamp: u32,
    pub frequency_start: u32,
    pub frequency_end: u32,
    pub detections: Vec<SubGhzDetection>,
}

const SUBGHZ_PREFIX: usize = 13;

impl SubGhzScanReport {
    pub fn encode(&self) -> Bytes {
        let count = entry_limit::<SubGhzDetection>(SUBGHZ_PREFIX, self.detections.len());
        let mut dst = BytesMut::with_capacity(SUBGHZ_PREFIX + count * SubGhzDetection::SIZE);
        dst.put_u32_le(self.timestamp);
        dst.put_u32_le(self.frequency_start);
        dst.put_u32_le(self.frequency_end);
        dst.put_u8(count as u8);
        for detection in &self.detections[..count] {
            detection.pack_into(&mut dst);
        }
        dst.freeze()
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len(SubGhzDetection::NAME, payload, SUBGHZ_PREFIX)?;
        let mut src = payload;
        let timestamp = src.get_u32_le();
        let frequency_start = src.get_u32_le();
        let frequency_end = src.get_u32_le();
        let count = usize::from(src.get_u8());
        Ok(Self {
            timestamp,
            frequency_start,
            frequency_end,
            detections: decode_entries(src, count)?,
        })
    }
}

fn entry_limit<T: ScanEntry>(prefix: usize, available: usize) -> usize {
    let fits = (MAX_PAYLOAD_SIZE - prefix) / T::SIZE;
    available.min(T::MAX_ENTRIES).min(fits)
}

fn decode_entries<T: WireRecord>(src: &[u8], count: usize) -> Result<Vec<T>> {
    let present = src.len() / T::SIZE;
    if present < count {
        debug!(
            record = T::NAME,
            declared = count,
            present,
            "scan list shorter than declared count"
        );
    }
    src.chunks_exact(T::SIZE)
        .take(count)
        .map(T::unpack)
        .collect()
}
