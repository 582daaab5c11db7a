//! Checking and converting the proof of one assertion.

use crate::compression::{
    BackrefKey, DEFAULT_MAX_LABELS, Decompressor, compress_labels, compress_tree, decompress,
};
use crate::engine::{ProofEngine, ProofOutcome};
use crate::error::{ProofError, ProofResult};
use mmkit_core::{
    Assertion, CompressedProof, INVALID_CODE, LabTok, Library, Proof, UncompressedProof,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How back-references are chosen when compressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionStrategy {
    /// Keep compressed proofs as they are, compress others by sentence
    #[default]
    Any,
    /// Number labels only, never save steps
    NoBackrefs,
    /// Refer back to any earlier step deriving the same sentence
    BackrefsOnIdenticalSentence,
    /// Refer back only to an earlier identical sub-proof
    BackrefsOnIdenticalTree,
}

impl CompressionStrategy {
    /// Name used in reports and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::NoBackrefs => "no-backrefs",
            Self::BackrefsOnIdenticalSentence => "sentence",
            Self::BackrefsOnIdenticalTree => "tree",
        }
    }
}

/// Runs the proof of one assertion against a library.
pub struct ProofExecutor<'a, L: Library + ?Sized> {
    lib: &'a L,
    assertion: &'a Assertion,
    proof: &'a Proof,
    max_labels: usize,
    gen_proof_tree: bool,
}

impl<'a, L: Library + ?Sized> ProofExecutor<'a, L> {
    /// Create an executor for `proof` as a proof of `assertion`.
    #[must_use]
    pub fn new(lib: &'a L, assertion: &'a Assertion, proof: &'a Proof) -> Self {
        Self {
            lib,
            assertion,
            proof,
            max_labels: DEFAULT_MAX_LABELS,
            gen_proof_tree: false,
        }
    }

    /// Create an executor for the proof attached to `assertion`.
    pub fn for_assertion(lib: &'a L, assertion: &'a Assertion) -> ProofResult<Self> {
        match assertion.proof() {
            Some(proof) => Ok(Self::new(lib, assertion, proof)),
            None => Err(ProofError::MissingProof(
                lib.resolve_label(assertion.thesis()).to_string(),
            )),
        }
    }

    /// Set the cap on labels a compressed proof may expand to.
    #[must_use]
    pub fn with_max_labels(mut self, max_labels: usize) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Request the derivation tree in the outcome.
    #[must_use]
    pub fn with_proof_tree(mut self, enabled: bool) -> Self {
        self.gen_proof_tree = enabled;
        self
    }

    /// The proof being executed.
    #[must_use]
    pub fn proof(&self) -> &'a Proof {
        self.proof
    }

    /// Check that the proof only refers to usable labels and valid codes.
    pub fn check_syntax(&self) -> ProofResult<()> {
        match self.proof {
            Proof::Uncompressed(proof) => {
                for &label in proof.labels() {
                    self.check_label(label)?;
                }
            }
            Proof::Compressed(proof) => {
                for &label in proof.refs() {
                    self.check_label(label)?;
                }
                let limit = self.assertion.mand_hyps_num() + proof.refs().len();
                let mut zeros = 0;
                for &code in proof.codes() {
                    if code == INVALID_CODE {
                        return Err(ProofError::SyntaxError("invalid code".to_string()));
                    }
                    if code == 0 {
                        zeros += 1;
                    } else if code as usize > limit + zeros {
                        return Err(ProofError::SyntaxError(format!(
                            "code {code} refers past the {zeros} steps saved so far"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_label(&self, label: LabTok) -> ProofResult<()> {
        if self.lib.assertion_of(label).is_some() {
            if label >= self.assertion.thesis() {
                return Err(ProofError::SyntaxError(format!(
                    "`{}` is not declared before `{}`",
                    self.lib.resolve_label(label),
                    self.name()
                )));
            }
            return Ok(());
        }
        if self.assertion.allows_hyp(label) {
            return Ok(());
        }
        Err(ProofError::SyntaxError(format!(
            "`{}` is not a hypothesis of `{}`",
            self.lib.resolve_label(label),
            self.name()
        )))
    }

    /// Check the syntax, then execute every proof step, without the final checks.
    pub fn execute(&self) -> ProofResult<ProofEngine<'a, L>> {
        self.check_syntax()?;
        self.execute_with_tree(self.gen_proof_tree)
    }

    fn execute_with_tree(&self, gen_proof_tree: bool) -> ProofResult<ProofEngine<'a, L>> {
        let mut engine = ProofEngine::new(self.lib).with_proof_tree(gen_proof_tree);
        match self.proof {
            Proof::Uncompressed(proof) => {
                for &label in proof.labels() {
                    engine.process_label(label)?;
                }
            }
            Proof::Compressed(proof) => {
                let mut decompressor = Decompressor::new(self.lib, self.assertion, proof.refs())
                    .with_max_labels(self.max_labels);
                for &code in proof.codes() {
                    let emitted = decompressor.push_code(code)?;
                    for &label in &decompressor.labels()[emitted] {
                        engine.process_label(label)?;
                    }
                }
            }
        }
        Ok(engine)
    }

    /// Check the proof completely.
    pub fn run(&self) -> ProofResult<ProofOutcome> {
        let engine = self.execute()?;

        let stack = engine.stack();
        if stack.len() != 1 {
            return Err(ProofError::StackShapeError { depth: stack.len() });
        }
        let thesis = self.lib.sentence_of(self.assertion.thesis());
        if &stack[0] != thesis {
            return Err(ProofError::ThesisMismatch {
                expected: self.lib.format_sentence(thesis),
                found: self.lib.format_sentence(&stack[0]),
            });
        }
        if let Some(pair) = engine
            .distinct()
            .iter()
            .find(|pair| !self.assertion.allows_dist(pair))
        {
            return Err(ProofError::DistinctSetTooWide {
                first: self.lib.resolve_symbol(pair.first()).to_string(),
                second: self.lib.resolve_symbol(pair.second()).to_string(),
            });
        }
        debug!(
            theorem = self.name(),
            steps = engine.proof_labels().len(),
            "proof verified"
        );
        Ok(engine.into_outcome())
    }

    /// Convert the proof to the uncompressed form.
    pub fn uncompress(&self) -> ProofResult<UncompressedProof> {
        self.check_syntax()?;
        match self.proof {
            Proof::Uncompressed(proof) => Ok(proof.clone()),
            Proof::Compressed(proof) => {
                decompress(self.lib, self.assertion, proof, self.max_labels)
                    .map(UncompressedProof::new)
            }
        }
    }

    /// Convert the proof to the compressed form.
    pub fn compress(&self, strategy: CompressionStrategy) -> ProofResult<CompressedProof> {
        if let (CompressionStrategy::Any, Proof::Compressed(proof)) = (strategy, self.proof) {
            self.check_syntax()?;
            return Ok(proof.clone());
        }
        let labels = self.uncompress()?;
        let compressed = match strategy {
            CompressionStrategy::NoBackrefs => compress_labels(self.assertion, labels.labels()),
            CompressionStrategy::Any | CompressionStrategy::BackrefsOnIdenticalSentence => {
                self.compress_with_backrefs(labels, BackrefKey::Sentence)?
            }
            CompressionStrategy::BackrefsOnIdenticalTree => {
                self.compress_with_backrefs(labels, BackrefKey::Structure)?
            }
        };
        debug!(
            theorem = self.name(),
            strategy = strategy.as_str(),
            refs = compressed.refs().len(),
            codes = compressed.codes().len(),
            "proof compressed"
        );
        Ok(compressed)
    }

    fn compress_with_backrefs(
        &self,
        proof: UncompressedProof,
        key: BackrefKey,
    ) -> ProofResult<CompressedProof> {
        let proof = Proof::Uncompressed(proof);
        let engine = ProofExecutor::new(self.lib, self.assertion, &proof)
            .with_max_labels(self.max_labels)
            .with_proof_tree(true)
            .execute()?;
        if engine.stack().len() != 1 {
            return Err(ProofError::StackShapeError {
                depth: engine.stack().len(),
            });
        }
        let tree = engine
            .into_outcome()
            .proof_tree
            .ok_or_else(|| ProofError::Internal("no derivation tree".to_string()))?;
        compress_tree(self.assertion, &tree, key)
    }

    /// Check whether the proof has a single essential step and saves nothing.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        let float_hyps = self.assertion.float_hyps();
        let essential_steps = match self.proof {
            Proof::Uncompressed(proof) => proof
                .labels()
                .iter()
                .filter(|label| !float_hyps.contains(label))
                .count(),
            Proof::Compressed(proof) => {
                if proof.saved_steps() > 0 {
                    return false;
                }
                proof
                    .codes()
                    .iter()
                    .filter(|&&code| code as usize > float_hyps.len())
                    .count()
            }
        };
        essential_steps <= 1
    }

    fn name(&self) -> &str {
        self.lib.resolve_label(self.assertion.thesis())
    }
}
