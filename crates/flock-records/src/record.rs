use bytes::{Bytes, BytesMut};

use crate::error::Result;

/// A record with a constant wire size and fixed field order.
pub trait WireRecord: Sized {
    /// Record name used in error messages.
    const NAME: &'static str;
    /// Exact encoded size in bytes.
    const SIZE: usize;

    /// Append exactly [`Self::SIZE`] bytes to `dst`.
    fn pack_into(&self, dst: &mut BytesMut);

    /// Decode from the first [`Self::SIZE`] bytes of `src`.
    fn unpack(src: &[u8]) -> Result<Self>;

    fn pack(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(Self::SIZE);
        self.pack_into(&mut dst);
        dst.freeze()
    }
}

/// A record that appears as an entry of a scan result list.
pub trait ScanEntry: WireRecord {
    /// Largest entry count the device reports in one result.
    const MAX_ENTRIES: usize;
    /// Message type that asks the device for a scan.
    const REQUEST_TYPE: u8;
    /// Message type of the result carrying this entry.
    const RESULT_TYPE: u8;
}
