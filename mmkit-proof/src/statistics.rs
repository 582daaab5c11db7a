//! Proof size statistics
//!
//! Compares the stored form of every proof with what a given compression
//! strategy produces for it.

use crate::codec::encode_codes;
use crate::config::VerifyConfig;
use crate::error::ProofResult;
use crate::executor::{CompressionStrategy, ProofExecutor};
use mmkit_core::{Assertion, Library};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Size figures of one proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStats {
    /// Theorem label
    pub label: String,
    /// Whether the stored proof is compressed
    pub stored_compressed: bool,
    /// Number of labels of the uncompressed proof
    pub steps: usize,
    /// Height of the derivation tree
    pub tree_height: usize,
    /// Explicit references of the compressed form
    pub refs: usize,
    /// Codes of the compressed form, save markers included
    pub codes: usize,
    /// Save markers of the compressed form
    pub saved_steps: usize,
    /// Letters of the compressed form
    pub letters: usize,
    /// Whether the proof has a single essential step
    pub trivial: bool,
}

impl ProofStats {
    /// Codes per uncompressed step, lower is better
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.steps == 0 {
            return 1.0;
        }
        self.codes as f64 / self.steps as f64
    }
}

/// Compute the statistics of one theorem's proof
pub fn proof_stats<L: Library + ?Sized>(
    lib: &L,
    assertion: &Assertion,
    strategy: CompressionStrategy,
    config: &VerifyConfig,
) -> ProofResult<ProofStats> {
    let executor = ProofExecutor::for_assertion(lib, assertion)?
        .with_max_labels(config.max_decompression_size)
        .with_proof_tree(true);
    let engine = executor.execute()?;
    let steps = engine.proof_labels().len();
    let tree_height = engine.proof_tree().map_or(0, |tree| tree.height());
    let compressed = executor.compress(strategy)?;
    Ok(ProofStats {
        label: lib.resolve_label(assertion.thesis()).to_string(),
        stored_compressed: executor.proof().is_compressed(),
        steps,
        tree_height,
        refs: compressed.refs().len(),
        codes: compressed.codes().len(),
        saved_steps: compressed.saved_steps(),
        letters: encode_codes(compressed.codes()).len(),
        trivial: executor.is_trivial(),
    })
}

/// Aggregate over many proofs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTotals {
    /// Number of proofs measured
    pub proofs: usize,
    /// Number of proofs that could not be measured
    pub errors: usize,
    /// Sum of uncompressed steps
    pub steps: usize,
    /// Sum of compressed codes
    pub codes: usize,
    /// Sum of compressed letters
    pub letters: usize,
    /// Number of trivial proofs
    pub trivial: usize,
}

impl StatsTotals {
    /// Sum up the measured proofs
    #[must_use]
    pub fn from_results(results: &[(String, ProofResult<ProofStats>)]) -> Self {
        let mut totals = Self::default();
        for (_, result) in results {
            match result {
                Ok(stats) => {
                    totals.proofs += 1;
                    totals.steps += stats.steps;
                    totals.codes += stats.codes;
                    totals.letters += stats.letters;
                    totals.trivial += usize::from(stats.trivial);
                }
                Err(_) => totals.errors += 1,
            }
        }
        totals
    }
}

/// Compute the statistics of every proved theorem, in declaration order
pub fn collect_stats<L: Library + Sync + ?Sized>(
    lib: &L,
    strategy: CompressionStrategy,
    config: &VerifyConfig,
) -> Vec<(String, ProofResult<ProofStats>)> {
    let theorems: Vec<&Assertion> = lib
        .assertions()
        .map(|(_, ass)| ass)
        .filter(|ass| ass.is_theorem() && ass.proof().is_some())
        .collect();
    theorems
        .par_iter()
        .map(|ass| {
            let name = lib.resolve_label(ass.thesis()).to_string();
            (name, proof_stats(lib, ass, strategy, config))
        })
        .collect()
}
