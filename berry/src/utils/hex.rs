// berry/src/utils/hex.rs

//! Hex rendering for UIDs, blocks and wire traces, plus a parser for keys
//! and block contents typed by hand.

use std::fmt::Write;

use crate::{Error, Result};

fn render(bytes: &[u8], sep: Option<char>) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if let (Some(c), true) = (sep, i != 0) {
            s.push(c);
        }
        // writing into a String cannot fail
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    render(bytes, None)
}

/// `&[0xde, 0xad]` -> `"de ad"`, the form used in trace logs.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    render(bytes, Some(' '))
}

/// Parse hex digits into bytes. Whitespace, `:` and `-` between digits are
/// ignored, so `"FF:FF:FF:FF:FF:FF"` and `"a0a1 a2a3 a4a5"` both parse.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| Error::FrameFormat(format!("invalid hex digit '{}'", c)))
        })
        .collect::<Result<_>>()?;

    if digits.len() % 2 != 0 {
        return Err(Error::FrameFormat("hex string has odd length".into()));
    }
    Ok(digits.chunks(2).map(|p| (p[0] << 4) | p[1]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering() {
        assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(bytes_to_hex_spaced(&[0xd5, 0x41, 0x00]), "d5 41 00");
        assert_eq!(bytes_to_hex_spaced(&[]), "");
    }

    #[test]
    fn parse_separators() {
        let key = vec![0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5];
        assert_eq!(parse_hex("a0a1a2a3a4a5").unwrap(), key);
        assert_eq!(parse_hex("A0:A1:A2:A3:A4:A5").unwrap(), key);
        assert_eq!(parse_hex("a0 a1-a2 a3a4\ta5").unwrap(), key);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse_hex("abc"), Err(Error::FrameFormat(_))));
        assert!(matches!(parse_hex("zz"), Err(Error::FrameFormat(_))));
    }
}
