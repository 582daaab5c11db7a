//! Proof values attached to theorems.
//!
//! Both representations are immutable once built. Executing, checking and
//! converting them is the job of `mmkit-proof`.

use crate::token::{CodeTok, LabTok};
use serde::{Deserialize, Serialize};

/// A proof stored as the flat list of labels in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UncompressedProof {
    labels: Vec<LabTok>,
}

impl UncompressedProof {
    /// Create a proof from its labels.
    #[must_use]
    pub fn new(labels: Vec<LabTok>) -> Self {
        Self { labels }
    }

    /// Labels in execution order.
    #[must_use]
    pub fn labels(&self) -> &[LabTok] {
        &self.labels
    }

    /// Number of proof steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check whether the proof has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A proof stored as explicit references plus a numeral code stream.
///
/// Codes `1..=m` denote the mandatory hypotheses of the proven assertion,
/// `m+1..=m+r` the entries of `refs`, larger codes the saved steps, and `0`
/// saves the step just completed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressedProof {
    refs: Vec<LabTok>,
    codes: Vec<CodeTok>,
}

impl CompressedProof {
    /// Create a proof from its references and codes.
    #[must_use]
    pub fn new(refs: Vec<LabTok>, codes: Vec<CodeTok>) -> Self {
        Self { refs, codes }
    }

    /// Explicitly referenced labels.
    #[must_use]
    pub fn refs(&self) -> &[LabTok] {
        &self.refs
    }

    /// Decoded numerals.
    #[must_use]
    pub fn codes(&self) -> &[CodeTok] {
        &self.codes
    }

    /// Number of save markers in the code stream.
    #[must_use]
    pub fn saved_steps(&self) -> usize {
        self.codes.iter().filter(|&&c| c == 0).count()
    }
}

/// A theorem's proof in either representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Proof {
    /// Flat list of labels
    Uncompressed(UncompressedProof),
    /// References plus numeral codes
    Compressed(CompressedProof),
}

impl Proof {
    /// Check whether the proof is in compressed form.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed(_))
    }
}

impl From<UncompressedProof> for Proof {
    fn from(proof: UncompressedProof) -> Self {
        Self::Uncompressed(proof)
    }
}

impl From<CompressedProof> for Proof {
    fn from(proof: CompressedProof) -> Self {
        Self::Compressed(proof)
    }
}
