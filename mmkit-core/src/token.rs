//! Token Types for Symbols, Labels and Proof Codes.
//!
//! Symbols and labels are interned by the library into dense non-zero
//! identifiers. Zero is reserved as the absent token, which lets
//! `Option<SymTok>` and `Option<LabTok>` stay four bytes wide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A symbol token: a constant or variable of the formal system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymTok(NonZeroU32);

/// A label token: the name of a hypothesis or an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabTok(NonZeroU32);

/// A decoded compressed-proof numeral.
pub type CodeTok = u32;

/// Sentinel for a numeral whose digits are still being read.
pub const INVALID_CODE: CodeTok = CodeTok::MAX;

/// An ordered sequence of symbols, first symbol being the typecode.
pub type Sentence = Vec<SymTok>;

macro_rules! dense_token {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Create a token from its raw value, `None` for the reserved zero.
            #[must_use]
            pub const fn new(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// Create the token stored at a zero-based table position.
            #[must_use]
            pub(crate) fn from_index(index: usize) -> Self {
                let raw = u32::try_from(index + 1).unwrap_or(u32::MAX);
                Self(NonZeroU32::new(raw).unwrap_or(NonZeroU32::MAX))
            }

            /// Get the raw value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0.get()
            }

            /// Get the zero-based table position of this token.
            #[must_use]
            pub const fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

dense_token!(SymTok, "$");
dense_token!(LabTok, "#");
