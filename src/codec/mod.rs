//! Base64 codec for gateway payloads.
//!
//! The gateway hands out opaque payloads as standard-alphabet base64 with
//! padding. Signatures are always computed over the bytes produced by
//! [`decode`], never over a re-encoded form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// A payload was not valid base64.
#[derive(Debug, Error)]
#[error("invalid base64 payload: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

/// Decode a base64 payload into raw bytes.
pub fn decode(payload: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(payload)?)
}

/// Encode raw bytes as base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_text() {
        for payload in ["", "AA==", "AAE=", "AAEC", "CgRwcm9wb3NhbC1ieXRlcw==", "/+/+"] {
            let bytes = decode(payload).unwrap();
            assert_eq!(encode(&bytes), payload);
        }
    }

    #[test]
    fn test_decode_known_value() {
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(encode(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn test_rejects_non_alphabet_characters() {
        assert!(decode("aGVs*G8=").is_err());
        assert!(decode("aGVsbG8=!").is_err());
        assert!(decode("a b").is_err());
    }

    #[test]
    fn test_rejects_bad_padding() {
        assert!(decode("aGVsbG8").is_err());
        assert!(decode("A===").is_err());
    }

    #[test]
    fn test_error_display() {
        let err = decode("%%%%").unwrap_err();
        assert!(err.to_string().starts_with("invalid base64 payload"));
    }
}
