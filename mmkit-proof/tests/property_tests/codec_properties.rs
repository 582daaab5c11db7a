//! Property-based tests for the numeral alphabet
//!
//! - Encoding then decoding is the identity on every valid code
//! - Encoded numerals use terminal letters only in last position
//! - Streams of numerals decode without separators

use mmkit_core::{CodeTok, INVALID_CODE};
use mmkit_proof::{decode_codes, encode_codes, encode_numeral};
use proptest::prelude::*;

/// Strategy for generating codes that are not the sentinel
fn code_strategy() -> impl Strategy<Value = CodeTok> {
    prop_oneof![0..200u32, 0..INVALID_CODE]
}

proptest! {
    /// Test that every valid code survives a round trip
    #[test]
    fn numeral_bijection(code in code_strategy()) {
        let letters = encode_numeral(code);
        prop_assert_eq!(decode_codes(&letters).unwrap(), vec![code]);
    }

    /// Test that a numeral is continuation letters followed by one terminal
    #[test]
    fn numeral_shape(code in 1..INVALID_CODE) {
        let letters = encode_numeral(code);
        let (last, init) = letters.as_bytes().split_last().unwrap();
        prop_assert!((b'A'..=b'T').contains(last));
        prop_assert!(init.iter().all(|b| (b'U'..=b'Y').contains(b)));
    }

    /// Test that concatenated numerals decode to the original sequence
    #[test]
    fn stream_round_trip(codes in prop::collection::vec(code_strategy(), 0..50)) {
        let letters = encode_codes(&codes);
        prop_assert_eq!(decode_codes(&letters).unwrap(), codes);
    }

    /// Test that the decoder never panics on arbitrary text
    #[test]
    fn decoder_total(text in "[A-Z ?a]{0,40}") {
        let _ = decode_codes(&text);
    }
}
