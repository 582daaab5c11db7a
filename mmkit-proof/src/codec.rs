//! Numeral alphabet of compressed proofs.
//!
//! A numeral is written most significant letter first as zero or more
//! continuation letters `U`-`Y` (digits 1-5) followed by one terminal letter
//! `A`-`T` (digits 1-20). `Z` stands alone and marks the step just completed
//! as saved; it decodes to code `0`.

use crate::error::{FormatError, FormatResult};
use mmkit_core::{CodeTok, INVALID_CODE};

/// Incremental decoder for the letter stream of a compressed proof.
#[derive(Debug, Clone, Default)]
pub struct CompressedDecoder {
    acc: CodeTok,
    in_numeral: bool,
}

impl CompressedDecoder {
    /// Create a decoder with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character, returning the code it completes, if any.
    ///
    /// Whitespace is ignored.
    pub fn push_char(&mut self, c: char) -> FormatResult<Option<CodeTok>> {
        match c {
            'A'..='T' => {
                let digit = c as CodeTok - 'A' as CodeTok + 1;
                let code = self
                    .acc
                    .checked_mul(20)
                    .and_then(|v| v.checked_add(digit))
                    .filter(|&v| v != INVALID_CODE)
                    .ok_or(FormatError::NumeralOverflow)?;
                self.acc = 0;
                self.in_numeral = false;
                Ok(Some(code))
            }
            'U'..='Y' => {
                let digit = c as CodeTok - 'U' as CodeTok + 1;
                self.acc = self
                    .acc
                    .checked_mul(5)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(FormatError::NumeralOverflow)?;
                self.in_numeral = true;
                Ok(None)
            }
            'Z' if self.in_numeral => Err(FormatError::MisplacedSaveMarker),
            'Z' => Ok(Some(0)),
            c if c.is_whitespace() => Ok(None),
            c => Err(FormatError::InvalidCharacter(c)),
        }
    }

    /// Check that no numeral was left unterminated.
    pub fn finish(&self) -> FormatResult<()> {
        if self.in_numeral {
            Err(FormatError::UnterminatedNumeral)
        } else {
            Ok(())
        }
    }
}

/// Decode a whole letter string.
pub fn decode_codes(text: &str) -> FormatResult<Vec<CodeTok>> {
    let mut decoder = CompressedDecoder::new();
    let mut codes = Vec::new();
    for c in text.chars() {
        if let Some(code) = decoder.push_char(c)? {
            codes.push(code);
        }
    }
    decoder.finish()?;
    Ok(codes)
}

/// Append the letters of one code to `out`.
pub fn encode_numeral_into(code: CodeTok, out: &mut String) {
    if code == 0 {
        out.push('Z');
        return;
    }
    let mut digits = Vec::with_capacity(8);
    let mut x = code - 1;
    digits.push(letter(b'A', x % 20));
    x /= 20;
    while x > 0 {
        x -= 1;
        digits.push(letter(b'U', x % 5));
        x /= 5;
    }
    out.extend(digits.iter().rev());
}

/// Letters of one code.
#[must_use]
pub fn encode_numeral(code: CodeTok) -> String {
    let mut out = String::new();
    encode_numeral_into(code, &mut out);
    out
}

/// Letters of a whole code stream, without separators.
#[must_use]
pub fn encode_codes(codes: &[CodeTok]) -> String {
    let mut out = String::with_capacity(codes.len() * 2);
    for &code in codes {
        encode_numeral_into(code, &mut out);
    }
    out
}

fn letter(base: u8, offset: CodeTok) -> char {
    char::from(base + offset as u8)
}
