//! Errors reported by the command-line tool

use mmkit_core::LibraryError;
use mmkit_proof::{ProofError, VerifyError};
use thiserror::Error;

/// Failure of a command, as opposed to a rejected proof
#[derive(Error, Debug)]
pub enum CliError {
    /// The snapshot could not be read or is inconsistent
    #[error("library error: {0}")]
    Library(#[from] LibraryError),

    /// A proof could not be converted
    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    /// Bulk verification could not start
    #[error("verification error: {0}")]
    Verify(#[from] VerifyError),

    /// Output could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A label given on the command line does not exist
    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    /// A label given on the command line is not a theorem
    #[error("'{0}' is not a theorem")]
    NotATheorem(String),

    /// No subcommand was given
    #[error("no command given, see --help")]
    MissingCommand,
}
