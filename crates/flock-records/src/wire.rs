//! Field helpers shared by the fixed-layout records.

use bytes::{Buf, BufMut, BytesMut};

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Write `text` into a zero-padded block of `width` bytes, always leaving a
/// terminating zero.
pub(crate) fn put_text(dst: &mut BytesMut, text: &str, width: usize) {
    let stored = truncate_utf8(text, width.saturating_sub(1));
    dst.put_slice(stored.as_bytes());
    dst.put_bytes(0, width - stored.len());
}

/// Read a `width`-byte text block, dropping trailing zeros.
pub(crate) fn get_text(src: &mut &[u8], width: usize) -> String {
    let block = &src[..width];
    let end = block.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let text = String::from_utf8_lossy(&block[..end]).into_owned();
    src.advance(width);
    text
}

/// Write `bytes` into a zero-padded block of `width` bytes, truncating if longer.
pub(crate) fn put_block(dst: &mut BytesMut, bytes: &[u8], width: usize) {
    let n = bytes.len().min(width);
    dst.put_slice(&bytes[..n]);
    dst.put_bytes(0, width - n);
}

pub(crate) fn get_array<const N: usize>(src: &mut &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    src.copy_to_slice(&mut out);
    out
}

pub(crate) fn put_bool(dst: &mut BytesMut, flag: bool) {
    dst.put_u8(u8::from(flag));
}

pub(crate) fn get_bool(src: &mut &[u8]) -> bool {
    src.get_u8() != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_truncated_and_padded() {
        let mut dst = BytesMut::new();
        put_text(&mut dst, "abcdef", 4);
        assert_eq!(dst.as_ref(), b"abc\0");

        let mut src: &[u8] = &dst;
        assert_eq!(get_text(&mut src, 4), "abc");
        assert!(src.is_empty());
    }

    #[test]
    fn truncation_keeps_whole_characters() {
        // "é" is two bytes; a 3-byte budget fits one of them.
        assert_eq!(truncate_utf8("éé", 3), "é");
        assert_eq!(truncate_utf8("short", 32), "short");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let raw = [0x66, 0xFF, 0x6F, 0x00];
        let mut src: &[u8] = &raw;
        assert_eq!(get_text(&mut src, 4), "f\u{FFFD}o");
    }

    #[test]
    fn block_pads_short_input() {
        let mut dst = BytesMut::new();
        put_block(&mut dst, &[1, 2], 4);
        assert_eq!(dst.as_ref(), &[1, 2, 0, 0]);
    }
}
