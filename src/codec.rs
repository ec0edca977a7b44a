//! Base64 standard and URL-safe encoding.
//!
//! Both alphabets keep `=` padding — this engine never strips it, unlike
//! most Base64 wrappers in the wild — so the wire format stays stable
//! across implementations.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::{DecodeError, Engine as _};

/// Encodes `bytes` using the standard Base64 alphabet (RFC 4648 §4),
/// padding kept. Empty input yields an empty string.
#[must_use]
pub fn encode_standard(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Encodes `bytes` using the URL-safe Base64 alphabet (RFC 4648 §5),
/// padding kept. Output never contains `+` or `/`.
#[must_use]
pub fn encode_urlsafe(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

/// Decodes a standard-alphabet Base64 string. URL-safe input is not
/// accepted here — decoding is the inverse of the standard form only.
pub fn decode_standard(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_encodes_to_empty_string() {
        assert_eq!(encode_standard(&[]), "");
        assert_eq!(encode_urlsafe(&[]), "");
    }

    #[test]
    fn standard_alphabet_is_subset_of_rfc4648() {
        let encoded = encode_standard(&[0xff, 0xfb, 0xef, 0xbf]);
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
    }

    #[test]
    fn urlsafe_output_never_contains_plus_or_slash() {
        // bytes chosen so the standard alphabet would emit both '+' and '/'
        let bytes = [0xfb, 0xef, 0xbf];
        let std_form = encode_standard(&bytes);
        assert!(std_form.contains('+') || std_form.contains('/'));

        let safe_form = encode_urlsafe(&bytes);
        assert!(!safe_form.contains('+'));
        assert!(!safe_form.contains('/'));
    }

    #[test]
    fn standard_roundtrip() {
        let data = b"hello, plugin world";
        let encoded = encode_standard(data);
        let decoded = decode_standard(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn decode_rejects_invalid_input() {
        assert!(decode_standard("not base64!!").is_err());
    }
}
