use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{SUBGHZ_SCAN_REQUEST, SUBGHZ_SCAN_RESULT};

use crate::enums::Modulation;
use crate::error::{ensure_len, Result};
use crate::record::{ScanEntry, WireRecord};
use crate::wire::{get_text, put_text};

const PROTOCOL_NAME_WIDTH: usize = 16;

/// One Sub-GHz emission seen during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubGhzDetection {
    /// Hz.
    pub frequency: u32,
    pub rssi: i8,
    pub modulation: Modulation,
    pub duration_ms: u16,
    /// Hz.
    pub bandwidth: u32,
    /// 0 when the protocol was not recognised.
    pub protocol_id: u8,
    pub protocol_name: String,
}

impl WireRecord for SubGhzDetection {
    const NAME: &'static str = "subghz detection";
    const SIZE: usize = 29;

    fn pack_into(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.frequency);
        dst.put_i8(self.rssi);
        dst.put_u8(self.modulation.into());
        dst.put_u16_le(self.duration_ms);
        dst.put_u32_le(self.bandwidth);
        dst.put_u8(self.protocol_id);
        put_text(dst, &self.protocol_name, PROTOCOL_NAME_WIDTH);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];
        Ok(Self {
            frequency: src.get_u32_le(),
            rssi: src.get_i8(),
            modulation: Modulation::from(src.get_u8()),
            duration_ms: src.get_u16_le(),
            bandwidth: src.get_u32_le(),
            protocol_id: src.get_u8(),
            protocol_name: get_text(&mut src, PROTOCOL_NAME_WIDTH),
        })
    }
}

impl ScanEntry for SubGhzDetection {
    const MAX_ENTRIES: usize = 16;
    const REQUEST_TYPE: u8 = SUBGHZ_SCAN_REQUEST;
    const RESULT_TYPE: u8 = SUBGHZ_SCAN_RESULT;
}
