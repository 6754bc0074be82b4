use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{NFC_SCAN_REQUEST, NFC_SCAN_RESULT};

use crate::error::{ensure_len, Result};
use crate::record::{ScanEntry, WireRecord};
use crate::wire::{get_array, get_text, put_text};

const TYPE_NAME_WIDTH: usize = 16;
const UID_WIDTH: usize = 10;

/// One proximity card seen by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NfcDetection {
    /// Zero-padded UID block; see [`NfcDetection::uid_bytes`].
    pub uid: [u8; UID_WIDTH],
    /// 4, 7 or 10 for ISO 14443-A cards.
    pub uid_len: u8,
    pub nfc_type: u8,
    pub sak: u8,
    pub atqa: [u8; 2],
    pub type_name: String,
}

impl NfcDetection {
    /// The meaningful part of the UID.
    pub fn uid_bytes(&self) -> &[u8] {
        &self.uid[..usize::from(self.uid_len).min(UID_WIDTH)]
    }
}

impl WireRecord for NfcDetection {
    const NAME: &'static str = "nfc detection";
    const SIZE: usize = 31;

    fn pack_into(&self, dst: &mut BytesMut) {
        dst.put_slice(&self.uid);
        dst.put_u8(self.uid_len);
        dst.put_u8(self.nfc_type);
        dst.put_u8(self.sak);
        dst.put_slice(&self.atqa);
        put_text(dst, &self.type_name, TYPE_NAME_WIDTH);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];
        Ok(Self {
            uid: get_array(&mut src),
            uid_len: src.get_u8(),
            nfc_type: src.get_u8(),
            sak: src.get_u8(),
            atqa: get_array(&mut src),
            type_name: get_text(&mut src, TYPE_NAME_WIDTH),
        })
    }
}

impl ScanEntry for NfcDetection {
    const MAX_ENTRIES: usize = 8;
    const REQUEST_TYPE: u8 = NFC_SCAN_REQUEST;
    const RESULT_TYPE: u8 = NFC_SCAN_RESULT;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mifare_classic_round_trips() {
        let card = NfcDetection {
            uid: [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 0, 0, 0],
            uid_len: 4,
            nfc_type: 0,
            sak: 0x08,
            atqa: [0x04, 0x00],
            type_name: "MIFARE Classic".into(),
        };

        let wire = card.pack();

        assert_eq!(wire.len(), 31);
        assert_eq!(&wire[10..15], &[4, 0, 0x08, 0x04, 0x00]);
        let decoded = NfcDetection::unpack(&wire).unwrap();
        assert_eq!(decoded, card);
        assert_eq!(decoded.uid_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn bogus_uid_len_is_bounded() {
        let card = NfcDetection {
            uid: [7; 10],
            uid_len: 99,
            nfc_type: 1,
            sak: 0,
            atqa: [0, 0],
            type_name: String::new(),
        };
        assert_eq!(card.uid_bytes().len(), 10);
    }
}
