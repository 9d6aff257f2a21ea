//! Conversion between the platform's multibyte encoding and UTF-16.
//!
//! On Windows the multibyte side is the calling thread's ANSI code page. Elsewhere
//! it is UTF-8, and malformed input is replaced rather than rejected.

use crate::{imp, Result};

/// Convert multibyte text to UTF-16.
pub fn to_wide<S: AsRef<[u8]> + ?Sized>(text: &S) -> Result<Vec<u16>> {
    let text = text.as_ref();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    imp::to_wide(text)
}

/// Convert UTF-16 text to the multibyte encoding.
pub fn to_multibyte<S: AsRef<[u16]> + ?Sized>(text: &S) -> Result<Vec<u8>> {
    let text = text.as_ref();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    imp::to_multibyte(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stays_empty() {
        assert_eq!(to_wide("").unwrap(), Vec::<u16>::new());
        assert_eq!(to_multibyte(&[] as &[u16]).unwrap(), b"");
    }

    #[test]
    fn ascii_round_trips() {
        let wide = to_wide("Hello World.").unwrap();
        assert_eq!(wide, "Hello World.".encode_utf16().collect::<Vec<_>>());
        assert_eq!(to_multibyte(&wide).unwrap(), b"Hello World.");
    }

    #[cfg(unix)]
    #[test]
    fn non_ascii_round_trips() {
        let wide = to_wide("あああ").unwrap();
        assert_eq!(wide, [0x3042, 0x3042, 0x3042]);
        assert_eq!(to_multibyte(&wide).unwrap(), "あああ".as_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn malformed_input_is_replaced() {
        assert_eq!(to_wide(&b"a\xffb"[..]).unwrap(), [0x61, 0xfffd, 0x62]);
        assert_eq!(to_multibyte(&[0xd800u16, 0x61][..]).unwrap(), "\u{fffd}a".as_bytes());
    }
}
