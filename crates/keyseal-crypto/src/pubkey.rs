//! Public key text encoding.
//!
//! Public keys travel as lowercase hex with no separators or prefix, two
//! characters per byte of the curve's point encoding.

use crate::error::CryptoError;

/// Encode raw public key bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Lenient decode: parse consecutive two-character chunks as hex bytes.
///
/// Chunks that are not a valid hex byte, including a trailing single
/// character, are dropped rather than reported. Use [`decode_strict`] when
/// the input must be validated.
pub fn decode(text: &str) -> Vec<u8> {
    text.as_bytes()
        .chunks(2)
        .filter(|chunk| chunk.len() == 2)
        .filter_map(|chunk| hex::decode(chunk).ok())
        .flatten()
        .collect()
}

/// Strict decode: every character must be hex and the length even.
pub fn decode_strict(text: &str) -> Result<Vec<u8>, CryptoError> {
    if text.is_empty() {
        return Err(CryptoError::CurveError("public key is empty".into()));
    }
    hex::decode(text).map_err(|e| CryptoError::CurveError(format!("malformed public key: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase_zero_padded() {
        assert_eq!(encode(&[0x00, 0x0a, 0xff, 0x10]), "000aff10");
    }

    #[test]
    fn encoded_length_is_twice_input() {
        let bytes = [7u8; 33];
        assert_eq!(encode(&bytes).len(), 66);
    }

    #[test]
    fn decode_reverses_encode() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&bytes)), bytes);
    }

    #[test]
    fn decode_drops_trailing_partial_chunk() {
        assert_eq!(decode("0a1"), vec![0x0a]);
    }

    #[test]
    fn decode_drops_unparseable_chunks() {
        assert_eq!(decode("0azz10"), vec![0x0a, 0x10]);
        assert!(decode("").is_empty());
    }

    #[test]
    fn decode_strict_rejects_malformed_input() {
        assert!(matches!(decode_strict(""), Err(CryptoError::CurveError(_))));
        assert!(matches!(decode_strict("0a1"), Err(CryptoError::CurveError(_))));
        assert!(matches!(decode_strict("0azz"), Err(CryptoError::CurveError(_))));
    }

    #[test]
    fn decode_strict_accepts_valid_hex() {
        assert_eq!(decode_strict("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }
}
