use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use flock_frame::message_type::{BLE_SCAN_REQUEST, BLE_SCAN_RESULT};

use crate::error::{ensure_len, Result};
use crate::record::{ScanEntry, WireRecord};
use crate::wire::{get_array, get_bool, get_text, put_block, put_bool, put_text};

const NAME_WIDTH: usize = 32;
const MAX_SERVICE_UUIDS: usize = 4;
const UUID_WIDTH: usize = 16;
const MANUFACTURER_DATA_WIDTH: usize = 32;

/// One BLE advertiser.
///
/// At most four service UUIDs and 32 bytes of manufacturer data are carried;
/// anything beyond that is dropped when packing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BleDevice {
    pub mac_address: [u8; 6],
    pub name: String,
    pub rssi: i8,
    /// 0 = public, 1 = random.
    pub address_type: u8,
    pub connectable: bool,
    pub service_uuids: Vec<[u8; UUID_WIDTH]>,
    pub manufacturer_id: [u8; 2],
    pub manufacturer_data: Vec<u8>,
}

impl WireRecord for BleDevice {
    const NAME: &'static str = "ble device";
    const SIZE: usize = 141;

    fn pack_into(&self, dst: &mut BytesMut) {
        let uuid_count = self.service_uuids.len().min(MAX_SERVICE_UUIDS);
        let data_len = self.manufacturer_data.len().min(MANUFACTURER_DATA_WIDTH);

        dst.put_slice(&self.mac_address);
        put_text(dst, &self.name, NAME_WIDTH);
        dst.put_i8(self.rssi);
        dst.put_u8(self.address_type);
        put_bool(dst, self.connectable);
        dst.put_u8(uuid_count as u8);
        for uuid in &self.service_uuids[..uuid_count] {
            dst.put_slice(uuid);
        }
        dst.put_bytes(0, (MAX_SERVICE_UUIDS - uuid_count) * UUID_WIDTH);
        dst.put_slice(&self.manufacturer_id);
        dst.put_u8(data_len as u8);
        put_block(dst, &self.manufacturer_data, MANUFACTURER_DATA_WIDTH);
    }

    fn unpack(src: &[u8]) -> Result<Self> {
        ensure_len(Self::NAME, src, Self::SIZE)?;
        let mut src = &src[..Self::SIZE];

        let mac_address = get_array(&mut src);
        let name = get_text(&mut src, NAME_WIDTH);
        let rssi = src.get_i8();
        let address_type = src.get_u8();
        let connectable = get_bool(&mut src);
        let uuid_count = usize::from(src.get_u8()).min(MAX_SERVICE_UUIDS);

        let mut service_uuids = Vec::with_capacity(uuid_count);
        for slot in 0..MAX_SERVICE_UUIDS {
            let uuid: [u8; UUID_WIDTH] = get_array(&mut src);
            if slot < uuid_count {
                service_uuids.push(uuid);
            }
        }

        let manufacturer_id = get_array(&mut src);
        let data_len = usize::from(src.get_u8()).min(MANUFACTURER_DATA_WIDTH);
        let manufacturer_data = src[..data_len].to_vec();

        Ok(Self {
            mac_address,
            name,
            rssi,
            address_type,
            connectable,
            service_uuids,
            manufacturer_id,
            manufacturer_data,
        })
    }
}

impl ScanEntry for BleDevice {
    const MAX_ENTRIES: usize = 32;
    const REQUEST_TYPE: u8 = BLE_SCAN_REQUEST;
    const RESULT_TYPE: u8 = BLE_SCAN_RESULT;
}
