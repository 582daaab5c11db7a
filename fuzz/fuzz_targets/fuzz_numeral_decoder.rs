//! Fuzz target for the compressed proof numeral decoder
//!
//! Arbitrary text must decode or fail cleanly, and every decoded code
//! stream must encode back to the letters it came from.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mmkit_proof::{decode_codes, encode_codes};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data)
        && let Ok(codes) = decode_codes(input)
    {
        let letters: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(encode_codes(&codes), letters);
    }
});
