//! Axioms and theorems.

use crate::proof::Proof;
use crate::token::{LabTok, SymTok};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An unordered pair of variables required to stay distinct.
///
/// The pair is stored as `(min, max)` regardless of how it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(SymTok, SymTok)", into = "(SymTok, SymTok)")]
pub struct DistinctPair(SymTok, SymTok);

impl DistinctPair {
    /// Create the canonical pair for two variables.
    #[must_use]
    pub fn new(a: SymTok, b: SymTok) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// The smaller variable.
    #[must_use]
    pub fn first(self) -> SymTok {
        self.0
    }

    /// The larger variable.
    #[must_use]
    pub fn second(self) -> SymTok {
        self.1
    }
}

impl From<(SymTok, SymTok)> for DistinctPair {
    fn from((a, b): (SymTok, SymTok)) -> Self {
        Self::new(a, b)
    }
}

impl From<DistinctPair> for (SymTok, SymTok) {
    fn from(pair: DistinctPair) -> Self {
        (pair.0, pair.1)
    }
}

/// A fully elaborated axiom or theorem.
///
/// Mandatory hypotheses are the floating ones followed by the essential
/// ones; this is the order in which a proof must leave them on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    theorem: bool,
    mand_dists: BTreeSet<DistinctPair>,
    #[serde(default)]
    opt_dists: BTreeSet<DistinctPair>,
    float_hyps: Vec<LabTok>,
    ess_hyps: Vec<LabTok>,
    #[serde(default)]
    opt_hyps: BTreeSet<LabTok>,
    thesis: LabTok,
    #[serde(default)]
    proof: Option<Proof>,
}

impl Assertion {
    /// Create an axiom.
    #[must_use]
    pub fn axiom(
        thesis: LabTok,
        float_hyps: Vec<LabTok>,
        ess_hyps: Vec<LabTok>,
        mand_dists: impl IntoIterator<Item = (SymTok, SymTok)>,
    ) -> Self {
        Self {
            theorem: false,
            mand_dists: mand_dists.into_iter().map(DistinctPair::from).collect(),
            opt_dists: BTreeSet::new(),
            float_hyps,
            ess_hyps,
            opt_hyps: BTreeSet::new(),
            thesis,
            proof: None,
        }
    }

    /// Create a theorem. `proof` is `None` for a theorem whose proof is
    /// marked incomplete.
    #[must_use]
    pub fn theorem(
        thesis: LabTok,
        float_hyps: Vec<LabTok>,
        ess_hyps: Vec<LabTok>,
        mand_dists: impl IntoIterator<Item = (SymTok, SymTok)>,
        proof: Option<Proof>,
    ) -> Self {
        Self {
            theorem: true,
            proof,
            ..Self::axiom(thesis, float_hyps, ess_hyps, mand_dists)
        }
    }

    /// Set the optional (dummy variable) hypotheses.
    #[must_use]
    pub fn with_opt_hyps(mut self, opt_hyps: impl IntoIterator<Item = LabTok>) -> Self {
        self.opt_hyps = opt_hyps.into_iter().collect();
        self
    }

    /// Set the optional distinct variable pairs.
    #[must_use]
    pub fn with_opt_dists(mut self, opt_dists: impl IntoIterator<Item = (SymTok, SymTok)>) -> Self {
        self.opt_dists = opt_dists.into_iter().map(DistinctPair::from).collect();
        self
    }

    /// Check whether this is a theorem rather than an axiom.
    #[must_use]
    pub fn is_theorem(&self) -> bool {
        self.theorem
    }

    /// Label of the assertion's own sentence.
    #[must_use]
    pub fn thesis(&self) -> LabTok {
        self.thesis
    }

    /// The attached proof, if any.
    #[must_use]
    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    /// Floating hypotheses in stack order.
    #[must_use]
    pub fn float_hyps(&self) -> &[LabTok] {
        &self.float_hyps
    }

    /// Essential hypotheses in stack order.
    #[must_use]
    pub fn ess_hyps(&self) -> &[LabTok] {
        &self.ess_hyps
    }

    /// Hypotheses usable in the proof only.
    #[must_use]
    pub fn opt_hyps(&self) -> &BTreeSet<LabTok> {
        &self.opt_hyps
    }

    /// Distinct pairs a caller of this assertion must respect.
    #[must_use]
    pub fn mand_dists(&self) -> &BTreeSet<DistinctPair> {
        &self.mand_dists
    }

    /// Distinct pairs usable inside the proof only.
    #[must_use]
    pub fn opt_dists(&self) -> &BTreeSet<DistinctPair> {
        &self.opt_dists
    }

    /// Check whether a distinct pair is declared, mandatory or optional.
    #[must_use]
    pub fn allows_dist(&self, pair: &DistinctPair) -> bool {
        self.mand_dists.contains(pair) || self.opt_dists.contains(pair)
    }

    /// Number of mandatory hypotheses.
    #[must_use]
    pub fn mand_hyps_num(&self) -> usize {
        self.float_hyps.len() + self.ess_hyps.len()
    }

    /// The `i`-th mandatory hypothesis in stack order.
    #[must_use]
    pub fn mand_hyp(&self, i: usize) -> Option<LabTok> {
        if i < self.float_hyps.len() {
            Some(self.float_hyps[i])
        } else {
            self.ess_hyps.get(i - self.float_hyps.len()).copied()
        }
    }

    /// Mandatory hypotheses in stack order.
    pub fn mand_hyps(&self) -> impl Iterator<Item = LabTok> + '_ {
        self.float_hyps.iter().chain(self.ess_hyps.iter()).copied()
    }

    /// Check whether `label` is one of the mandatory hypotheses.
    #[must_use]
    pub fn is_mand_hyp(&self, label: LabTok) -> bool {
        self.float_hyps.contains(&label) || self.ess_hyps.contains(&label)
    }

    /// Check whether a proof of this assertion may reference `label` as a
    /// hypothesis.
    #[must_use]
    pub fn allows_hyp(&self, label: LabTok) -> bool {
        self.is_mand_hyp(label) || self.opt_hyps.contains(&label)
    }
}
