//! mmkit Core - Data Model for Metamath Proof Verification
//!
//! This crate provides the types every other mmkit crate builds on:
//! - Dense [`SymTok`] and [`LabTok`] tokens interned by the library
//! - [`Assertion`] descriptions of axioms and theorems
//! - The two [`Proof`] representations
//! - The [`Library`] trait and its in-memory table [`LibraryImpl`]
//!
//! # Examples
//!
//! ```
//! use mmkit_core::{Assertion, Library, LibraryImpl, SentenceType};
//!
//! let mut lib = LibraryImpl::new();
//! lib.create_symbol("wff", true).unwrap();
//! lib.create_symbol("ph", false).unwrap();
//! let wph = lib.add_statement("wph", "wff ph", SentenceType::FloatingHyp).unwrap();
//! let ax = lib.add_statement("ax-ph", "wff ph", SentenceType::Axiom).unwrap();
//! lib.add_assertion(ax, Assertion::axiom(ax, vec![wph], vec![], [])).unwrap();
//!
//! assert!(lib.validate().is_ok());
//! assert_eq!(lib.format_sentence(lib.sentence_of(ax)), "wff ph");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assertion;
pub mod error;
pub mod library;
pub mod proof;
pub mod token;

pub use assertion::{Assertion, DistinctPair};
pub use error::{LibraryError, LibraryResult};
pub use library::{Library, LibraryImpl, SentenceType};
pub use proof::{CompressedProof, Proof, UncompressedProof};
pub use token::{CodeTok, INVALID_CODE, LabTok, Sentence, SymTok};
