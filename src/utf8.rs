use alloc::vec::Vec;
use core::str;

use crate::common::{Error, Result};

/// Append the UTF-8 encoding of a codepoint to `buf`.
///
/// Returns `Error::EncodingFailure` for surrogates and values above
/// `MAX_CODEPOINT`. Nothing is appended in that case.
pub fn encode_utf8(cp: u32, buf: &mut Vec<u8>) -> Result<()> {
    let c = char::from_u32(cp).ok_or(Error::EncodingFailure(cp))?;
    let mut bytes = [0; 4];
    buf.extend_from_slice(c.encode_utf8(&mut bytes).as_bytes());
    Ok(())
}

/// Append the UTF-8 encoding of a sequence of codepoints to `buf`.
///
/// On failure, `buf` may contain the encoding of a prefix of the sequence.
pub fn encode_utf8_all(cps: &[u32], buf: &mut Vec<u8>) -> Result<()> {
    for &cp in cps {
        encode_utf8(cp, buf)?;
    }
    Ok(())
}

/// The length of a UTF-8 sequence starting with `lead`, or `None` if `lead`
/// cannot start a sequence.
#[inline]
pub fn utf8_sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Decode the first codepoint of `bytes`.
///
/// Returns the codepoint and the number of bytes it occupies, or `None` if
/// `bytes` does not start with a valid UTF-8 sequence.
pub fn decode_utf8(bytes: &[u8]) -> Option<(u32, usize)> {
    let len = utf8_sequence_len(*bytes.first()?)?;
    let s = str::from_utf8(bytes.get(..len)?).ok()?;
    let c = s.chars().next()?;
    Some((u32::from(c), len))
}

/// Decode `bytes` as exactly one codepoint.
pub fn decode_utf8_single(bytes: &[u8]) -> Option<u32> {
    match decode_utf8(bytes)? {
        (cp, len) if len == bytes.len() => Some(cp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = Vec::new();
        encode_utf8(0xdf, &mut buf).unwrap();
        assert_eq!(buf, [0xc3, 0x9f]);

        buf.clear();
        encode_utf8_all(&[0x69, 0x307], &mut buf).unwrap();
        assert_eq!(buf, [0x69, 0xcc, 0x87]);

        buf.clear();
        encode_utf8(0x10_ffff, &mut buf).unwrap();
        assert_eq!(buf, [0xf4, 0x8f, 0xbf, 0xbf]);
    }

    #[test]
    fn test_encode_invalid() {
        let mut buf = Vec::new();
        assert_eq!(
            encode_utf8(0xd800, &mut buf),
            Err(Error::EncodingFailure(0xd800))
        );
        assert_eq!(
            encode_utf8(0x11_0000, &mut buf),
            Err(Error::EncodingFailure(0x11_0000))
        );
        assert!(buf.is_empty());

        assert_eq!(
            encode_utf8_all(&[0x73, 0xdfff], &mut buf),
            Err(Error::EncodingFailure(0xdfff))
        );
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_utf8(b"A"), Some((0x41, 1)));
        assert_eq!(decode_utf8("ßen".as_bytes()), Some((0xdf, 2)));
        assert_eq!(decode_utf8("\u{1e9e}".as_bytes()), Some((0x1e9e, 3)));
        assert_eq!(decode_utf8("\u{10400}".as_bytes()), Some((0x10400, 4)));
        assert_eq!(decode_utf8(b""), None);
        // Truncated.
        assert_eq!(decode_utf8(&[0xc3]), None);
        // Continuation byte.
        assert_eq!(decode_utf8(&[0x9f, 0x41]), None);
        // Encoded surrogate.
        assert_eq!(decode_utf8(&[0xed, 0xa0, 0x80]), None);
    }

    #[test]
    fn test_decode_single() {
        assert_eq!(decode_utf8_single(&[0xc3, 0x9f]), Some(0xdf));
        assert_eq!(decode_utf8_single(b"ss"), None);
        assert_eq!(decode_utf8_single(b""), None);
    }
}
