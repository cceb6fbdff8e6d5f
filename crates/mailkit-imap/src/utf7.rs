//! Modified UTF-7 codec for mailbox names (RFC 3501 section 5.1.3).
//!
//! Mailbox names travel over the wire in a 7-bit form: printable ASCII is
//! sent as-is, `&` is escaped as `&-`, and every other character is grouped
//! into a run of base64-encoded UTF-16BE delimited by `&` and `-`. The base64
//! alphabet uses `,` where standard base64 uses `/`.
//!
//! # Example
//!
//! ```
//! use mailkit_imap::utf7;
//!
//! assert_eq!(utf7::encode("Hello ö"), b"Hello &APY-");
//! assert_eq!(utf7::decode(b"&BD8EQAQ4BDIENQRC-").unwrap(), "привет");
//! ```

use base64::Engine;
use base64::alphabet::IMAP_MUTF7;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::{Error, Result};

/// Base64 engine with the `+,` alphabet and no padding.
const MUTF7: GeneralPurpose = GeneralPurpose::new(
    &IMAP_MUTF7,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Returns true if the character is sent unchanged.
const fn is_direct(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{25}' | '\u{27}'..='\u{7e}')
}

/// Encodes a Unicode mailbox name into modified UTF-7.
#[must_use]
pub fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut pending = String::new();

    for c in text.chars() {
        if is_direct(c) {
            flush_run(&mut out, &mut pending);
            out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
        } else if c == '&' {
            flush_run(&mut out, &mut pending);
            out.extend_from_slice(b"&-");
        } else {
            pending.push(c);
        }
    }
    flush_run(&mut out, &mut pending);

    out
}

/// Encodes a Unicode mailbox name into a modified UTF-7 string.
///
/// The output is always 7-bit ASCII.
#[must_use]
pub fn encode_to_string(text: &str) -> String {
    encode(text).into_iter().map(char::from).collect()
}

fn flush_run(out: &mut Vec<u8>, pending: &mut String) {
    if pending.is_empty() {
        return;
    }

    let utf16: Vec<u8> = pending
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect();

    out.push(b'&');
    out.extend_from_slice(MUTF7.encode(utf16).as_bytes());
    out.push(b'-');
    pending.clear();
}

/// Decodes a modified UTF-7 mailbox name into Unicode.
///
/// Bytes outside an escape run map to the code point of the same value. An
/// escape run left open at the end of input is decoded as if it were closed.
///
/// # Errors
///
/// Returns [`Error::Utf7`] if an escape run is not valid base64 or does not
/// hold well-formed UTF-16.
pub fn decode(input: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    // Bytes of the current escape run, without the opening `&`.
    let mut run: Option<Vec<u8>> = None;

    for &b in input {
        if let Some(buf) = run.as_mut() {
            if b == b'-' {
                if buf.is_empty() {
                    out.push('&');
                } else {
                    out.push_str(&decode_run(buf)?);
                }
                run = None;
            } else {
                buf.push(b);
            }
        } else if b == b'&' {
            run = Some(Vec::new());
        } else {
            out.push(char::from(b));
        }
    }

    if let Some(buf) = run
        && !buf.is_empty()
    {
        out.push_str(&decode_run(&buf)?);
    }

    Ok(out)
}

fn decode_run(run: &[u8]) -> Result<String> {
    let bytes = MUTF7.decode(run).map_err(|e| Error::Utf7 {
        message: format!("{e} in {:?}", String::from_utf8_lossy(run)),
    })?;

    if bytes.len() % 2 != 0 {
        return Err(Error::Utf7 {
            message: format!(
                "odd number of UTF-16 bytes in {:?}",
                String::from_utf8_lossy(run)
            ),
        });
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| Error::Utf7 {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::non_ascii_literal)]
mod tests {
    use super::*;

    #[test]
    fn encode_ascii_passthrough() {
        assert_eq!(encode("INBOX"), b"INBOX");
        assert_eq!(encode("Work/Projects 2024"), b"Work/Projects 2024");
    }

    #[test]
    fn encode_ampersand() {
        assert_eq!(encode("Tom & Jerry"), b"Tom &- Jerry");
        assert_eq!(encode("&"), b"&-");
    }

    #[test]
    fn encode_non_ascii() {
        assert_eq!(encode("привет"), b"&BD8EQAQ4BDIENQRC-");
        assert_eq!(encode("Hello ö"), b"Hello &APY-");
        assert_eq!(encode("🔥 ideas"), b"&2D3dJQ- ideas");
    }

    #[test]
    fn encode_uses_comma_alphabet() {
        // U+FFFF encodes to base64 containing `/` in the standard alphabet
        assert_eq!(encode("\u{ffff}"), b"&,,8-");
    }

    #[test]
    fn encode_control_characters_are_escaped() {
        assert_eq!(encode("a\tb"), b"a&AAk-b");
    }

    #[test]
    fn encode_to_string_is_ascii() {
        assert_eq!(encode_to_string("Entwürfe"), "Entw&APw-rfe");
    }

    #[test]
    fn decode_simple() {
        assert_eq!(decode(b"&APY-").unwrap(), "ö");
        assert_eq!(decode(b"Hello &APY-").unwrap(), "Hello ö");
        assert_eq!(decode(b"&APY-&APY-").unwrap(), "öö");
        assert_eq!(decode(b"&BD8EQAQ4BDIENQRC-").unwrap(), "привет");
    }

    #[test]
    fn decode_surrogate_pair() {
        assert_eq!(decode(b"&2D3dJQ- ideas").unwrap(), "🔥 ideas");
    }

    #[test]
    fn decode_escaped_ampersand() {
        assert_eq!(decode(b"Tom &- Jerry").unwrap(), "Tom & Jerry");
    }

    #[test]
    fn decode_unterminated_run() {
        assert_eq!(decode(b"Hello &APY").unwrap(), "Hello ö");
    }

    #[test]
    fn decode_lone_dash_outside_run() {
        assert_eq!(decode(b"a-b").unwrap(), "a-b");
    }

    #[test]
    fn decode_high_bytes_pass_through() {
        assert_eq!(decode(&[b'a', 0xe9]).unwrap(), "a\u{e9}");
    }

    #[test]
    fn decode_invalid_base64() {
        assert!(matches!(decode(b"&!!-"), Err(Error::Utf7 { .. })));
    }

    #[test]
    fn decode_unpaired_surrogate() {
        // 0xD83D alone
        assert!(matches!(decode(b"&2D0-"), Err(Error::Utf7 { .. })));
    }

    #[test]
    fn round_trip() {
        for s in ["", "INBOX", "Tom & Jerry", "Входящие/Работа", "日本語 & more", "a&b&&c"] {
            assert_eq!(decode(&encode(s)).unwrap(), s);
        }
    }
}
