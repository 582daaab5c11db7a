//! mmkit Proof - Proof Engine, Executor and Compressed Proof Codec
//!
//! This crate checks and converts Metamath proofs over a [`mmkit_core::Library`]:
//! - [`ProofEngine`]: the stack machine with substitution, distinct variable
//!   checks and checkpoint/rollback transactions
//! - [`ProofExecutor`]: runs one assertion's proof and converts it between the
//!   compressed and uncompressed forms
//! - [`codec`] and [`compression`]: the numeral alphabet and the back-reference
//!   algorithms
//! - [`LibraryVerifier`]: parallel verification of a whole library
//!
//! # Examples
//!
//! ```
//! use mmkit_core::{Assertion, Library, LibraryImpl, SentenceType};
//! use mmkit_proof::{CompressionStrategy, ProofExecutor, format_proof, parse_proof};
//!
//! let mut lib = LibraryImpl::new();
//! for c in ["wff", "(", ")", "->"] {
//!     lib.create_symbol(c, true).unwrap();
//! }
//! lib.create_symbol("ph", false).unwrap();
//! lib.create_symbol("ps", false).unwrap();
//! let wph = lib.add_statement("wph", "wff ph", SentenceType::FloatingHyp).unwrap();
//! let wps = lib.add_statement("wps", "wff ps", SentenceType::FloatingHyp).unwrap();
//! let wi = lib.add_statement("wi", "wff ( ph -> ps )", SentenceType::Axiom).unwrap();
//! lib.add_assertion(wi, Assertion::axiom(wi, vec![wph, wps], vec![], [])).unwrap();
//!
//! let th = lib
//!     .add_statement("wii", "wff ( ph -> ph )", SentenceType::Proposition)
//!     .unwrap();
//! let proof = parse_proof(&lib, "wph wph wi").unwrap();
//! lib.add_assertion(th, Assertion::theorem(th, vec![wph], vec![], [], Some(proof)))
//!     .unwrap();
//!
//! let ass = lib.assertion_of(th).unwrap();
//! let executor = ProofExecutor::for_assertion(&lib, ass).unwrap();
//! executor.run().unwrap();
//!
//! let compressed = executor.compress(CompressionStrategy::Any).unwrap();
//! assert_eq!(format_proof(&lib, &compressed.into()), "( wi ) AAB");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod compression;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod statistics;
pub mod text;
pub mod verify;

#[cfg(test)]
mod test_support;

pub use codec::{CompressedDecoder, decode_codes, encode_codes, encode_numeral};
pub use compression::{DEFAULT_MAX_LABELS, Decompressor};
pub use config::VerifyConfig;
pub use engine::{ProofEngine, ProofOutcome, ProofTree};
pub use error::{FormatError, FormatResult, ProofError, ProofResult, VerifyError};
pub use executor::{CompressionStrategy, ProofExecutor};
pub use statistics::{ProofStats, StatsTotals, collect_stats, proof_stats};
pub use text::{format_proof, parse_proof};
pub use verify::{
    LibraryVerifier, ProgressCallback, VerificationReport, VerificationStatus,
    VerificationSummary, VerifyProgress,
};
