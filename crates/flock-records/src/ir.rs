use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{IR_SCAN_REQUEST, IR_SCAN_RESULT};

use crate::error::{ensure_len, Result};
use crate::record::{ScanEntry, WireRecord};
use crate::wire::{get_bool, get_text, put_bool, put_text};

const PROTOCOL_NAME_WIDTH: usize = 16;

/// One decoded infrared signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrDetection {
    pub timestamp: u32,
    pub protocol_id: u8,
    pub protocol_name: String,
    pub address: u32,
    pub command: u32,
    pub repeat: bool,
    pub signal_strength: i8,
}

impl WireRecord for IrDetection {
    const NAME: &'static str = "ir detection";
    const SIZE: usize = 31;

    fn pack_into(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.timestamp);
        dst.put_u8(self.protocol_id);
        put_text(dst, &self.protocol_name, PROTOCOL_NAME_WIDTH);
        dst.put_u32_le(self.address);
        dst.put_u32_le(self.command);
        put_bool(dst, self.repeat);
        dst.put_i8(self.signal_strength);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];
        Ok(Self {
            timestamp: src.get_u32_le(),
            protocol_id: src.get_u8(),
            protocol_name: get_text(&mut src, PROTOCOL_NAME_WIDTH),
            address: src.get_u32_le(),
            command: src.get_u32_le(),
            repeat: get_bool(&mut src),
            signal_strength: src.get_i8(),
        })
    }
}

impl ScanEntry for IrDetection {
    const MAX_ENTRIES: usize = 16;
    const REQUEST_TYPE: u8 = IR_SCAN_REQUEST;
    const RESULT_TYPE: u8 = IR_SCAN_RESULT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nec_frame_round_trips() {
        let detection = IrDetection {
            timestamp: 1_700_000_000,
            protocol_id: 1,
            protocol_name: "NEC".into(),
            address: 0x04,
            command: 0x08,
            repeat: true,
            signal_strength: -3,
        };

        let wire = detection.pack();

        assert_eq!(wire.len(), 31);
        assert_eq!(&wire[5..8], b"NEC");
        assert_eq!(&wire[21..25], &[0x04, 0, 0, 0]);
        assert_eq!(wire[29], 1);
        assert_eq!(IrDetection::unpack(&wire).unwrap(), detection);
    }
}
