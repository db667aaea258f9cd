//! BER length codec.
//!
//! Short form: a single byte `0..127` when the length is under 128.
//! Long form: a leading byte `0x80 | N` followed by `N` big-endian bytes of
//! the value, with `N` minimal. The indefinite form (leading byte `0x80`
//! with `N == 0`) is not supported by SNMP and is rejected on decode.

use crate::error::{Error, Result};

/// Encode a length in minimal BER form.
///
/// Returns a stack-allocated array and the number of valid bytes, with the
/// valid bytes at the END of the array — matching the convention used by
/// the integer encoders in `ber::encode`, so callers can slice and push
/// without an intermediate allocation.
#[inline]
pub fn encode_length(len: usize) -> ([u8; 9], usize) {
    if len < 128 {
        let mut out = [0u8; 9];
        out[8] = len as u8;
        return (out, 1);
    }

    let bytes = (len as u64).to_be_bytes();
    let mut start = 0;
    while start < 7 && bytes[start] == 0 {
        start += 1;
    }
    let value_len = 8 - start;
    let total = 1 + value_len;

    let mut out = [0u8; 9];
    out[9 - total] = 0x80 | value_len as u8;
    out[9 - total + 1..9].copy_from_slice(&bytes[start..]);
    (out, total)
}

/// Decode a length from the front of `input`, returning the length and the
/// number of bytes consumed.
///
/// Fails with [`Error::MalformedLength`] if the indefinite form is used, if
/// the long-form count byte is itself truncated, or if the declared length
/// bytes overrun `input`.
pub fn decode_length(input: &[u8]) -> Result<(usize, usize)> {
    let first = *input.first().ok_or(Error::MalformedLength)?;

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let count = (first & 0x7F) as usize;
    if count == 0 {
        // Indefinite length form - not supported.
        return Err(Error::MalformedLength);
    }
    if count > 8 {
        return Err(Error::MalformedLength);
    }

    let value_bytes = input.get(1..1 + count).ok_or(Error::MalformedLength)?;
    let mut value: u64 = 0;
    for &b in value_bytes {
        value = (value << 8) | b as u64;
    }

    Ok((value as usize, 1 + count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(len: usize) -> Vec<u8> {
        let (arr, count) = encode_length(len);
        arr[9 - count..].to_vec()
    }

    #[test]
    fn short_form() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn long_form_minimal() {
        assert_eq!(encode(128), vec![0x81, 0x80]);
        assert_eq!(encode(255), vec![0x81, 0xFF]);
        assert_eq!(encode(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(encode(65535), vec![0x82, 0xFF, 0xFF]);
        assert_eq!(encode(65536), vec![0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn round_trip() {
        for len in [0usize, 1, 127, 128, 129, 255, 256, 65535, 65536, 10_000_000] {
            let encoded = encode(len);
            let (decoded, consumed) = decode_length(&encoded).unwrap();
            assert_eq!(decoded, len);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn indefinite_form_rejected() {
        assert!(matches!(decode_length(&[0x80]), Err(Error::MalformedLength)));
    }

    #[test]
    fn truncated_long_form_rejected() {
        // Announces 2 length bytes but supplies only 1.
        assert!(matches!(
            decode_length(&[0x82, 0x01]),
            Err(Error::MalformedLength)
        ));
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(decode_length(&[]), Err(Error::MalformedLength)));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_round_trip(len in 0usize..10_000_000) {
            let (arr, count) = encode_length(len);
            let bytes = &arr[9 - count..];
            let (decoded, consumed) = decode_length(bytes).unwrap();
            prop_assert_eq!(decoded, len);
            prop_assert_eq!(consumed, bytes.len());
        }

        #[test]
        fn prop_short_form_below_128(len in 0usize..128) {
            let (_, count) = encode_length(len);
            prop_assert_eq!(count, 1);
        }

        #[test]
        fn prop_minimal_long_form(len in 128usize..10_000_000) {
            let (arr, count) = encode_length(len);
            // No redundant leading zero byte in the value portion.
            if count > 2 {
                prop_assert_ne!(arr[9 - count + 1], 0);
            }
        }
    }
}
