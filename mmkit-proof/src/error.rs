//! Error types for proof checking, proof text and bulk verification.
//!
//! Messages carry label and symbol names, resolved through the library at the
//! point where the failure is detected.

use thiserror::Error;

/// A reason a proof was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Fewer stack entries than the step needs
    #[error("stack underflow at `{label}`: needs {needed} entries, found {found}")]
    StackUnderflow {
        /// Label of the failing step
        label: String,
        /// Entries required
        needed: usize,
        /// Entries available
        found: usize,
    },
    /// A floating hypothesis met an entry of the wrong type
    #[error("floating hypothesis `{hyp}` of `{label}` expects typecode `{expected}`, found `{found}`")]
    FloatingMismatch {
        /// Label of the failing step
        label: String,
        /// Floating hypothesis being matched
        hyp: String,
        /// Expected typecode
        expected: String,
        /// Stack entry
        found: String,
    },
    /// A constant of an essential hypothesis was not matched
    #[error("essential hypothesis `{hyp}` of `{label}` does not match `{found}`: constant mismatch")]
    EssentialConstantMismatch {
        /// Label of the failing step
        label: String,
        /// Essential hypothesis being matched
        hyp: String,
        /// Stack entry
        found: String,
    },
    /// A variable substitution inside an essential hypothesis was not matched
    #[error("essential hypothesis `{hyp}` of `{label}` does not match `{found}`: substitution mismatch")]
    EssentialSubstMismatch {
        /// Label of the failing step
        label: String,
        /// Essential hypothesis being matched
        hyp: String,
        /// Stack entry
        found: String,
    },
    /// The stack entry is longer or shorter than the substituted hypothesis
    #[error("essential hypothesis `{hyp}` of `{label}` does not match `{found}`: length mismatch")]
    EssentialLengthMismatch {
        /// Label of the failing step
        label: String,
        /// Essential hypothesis being matched
        hyp: String,
        /// Stack entry
        found: String,
    },
    /// Two variables required to be distinct share a variable after substitution
    #[error("distinct variable violation at `{label}`: `{first}` and `{second}` share `{var}`")]
    DistinctVariableViolation {
        /// Label of the failing step
        label: String,
        /// First variable of the violated pair
        first: String,
        /// Second variable of the violated pair
        second: String,
        /// Shared variable
        var: String,
    },
    /// The proof ends with a sentence other than the thesis
    #[error("proof derives `{found}` instead of `{expected}`")]
    ThesisMismatch {
        /// The theorem's own sentence
        expected: String,
        /// The derived sentence
        found: String,
    },
    /// The proof does not end with exactly one stack entry
    #[error("proof ends with {depth} stack entries instead of one")]
    StackShapeError {
        /// Final stack depth
        depth: usize,
    },
    /// The proof needs a distinct variable pair the theorem does not declare
    #[error("proof needs undeclared distinct variable pair `{first}` `{second}`")]
    DistinctSetTooWide {
        /// First variable
        first: String,
        /// Second variable
        second: String,
    },
    /// Malformed proof structure
    #[error("syntax error: {0}")]
    SyntaxError(String),
    /// Decompression exceeded the label cap
    #[error("proof expands to more than {limit} labels")]
    ProofTooLarge {
        /// Cap in labels
        limit: usize,
    },
    /// The assertion has no proof to check
    #[error("`{0}` has no proof")]
    MissingProof(String),
    /// A broken internal invariant
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProofError {
    /// Stable short name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StackUnderflow { .. } => "stack_underflow",
            Self::FloatingMismatch { .. } => "floating_mismatch",
            Self::EssentialConstantMismatch { .. } => "essential_constant_mismatch",
            Self::EssentialSubstMismatch { .. } => "essential_subst_mismatch",
            Self::EssentialLengthMismatch { .. } => "essential_length_mismatch",
            Self::DistinctVariableViolation { .. } => "distinct_variable_violation",
            Self::ThesisMismatch { .. } => "thesis_mismatch",
            Self::StackShapeError { .. } => "stack_shape_error",
            Self::DistinctSetTooWide { .. } => "distinct_set_too_wide",
            Self::SyntaxError(_) => "syntax_error",
            Self::ProofTooLarge { .. } => "proof_too_large",
            Self::MissingProof(_) => "missing_proof",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// Malformed proof text or compressed numeral stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A character outside the numeral alphabet
    #[error("invalid character `{0}` in compressed proof")]
    InvalidCharacter(char),
    /// `Z` in the middle of a numeral
    #[error("save marker inside a numeral")]
    MisplacedSaveMarker,
    /// Numeral does not fit in a code token
    #[error("numeral overflow in compressed proof")]
    NumeralOverflow,
    /// Continuation digits with no terminal digit
    #[error("unterminated numeral at end of compressed proof")]
    UnterminatedNumeral,
    /// Missing closing parenthesis of the reference list
    #[error("unterminated reference list")]
    UnterminatedRefs,
    /// Label text that the library does not know
    #[error("unknown label `{0}`")]
    UnknownLabel(String),
    /// The proof is `?`
    #[error("proof is incomplete")]
    Incomplete,
}

/// Result type for proof text operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Error type for bulk verification setup
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Thread pool construction failed
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A requested label does not exist or is not a theorem
    #[error("not a theorem: {0}")]
    NotATheorem(String),
}
