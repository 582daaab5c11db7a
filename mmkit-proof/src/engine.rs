//! Stack machine executing proof steps.
//!
//! Every step either pushes a hypothesis sentence or applies an assertion to
//! the top of the stack. Applying an assertion unifies its floating
//! hypotheses with the stack entries, checks the essential hypotheses and the
//! distinct variable conditions under that substitution, and replaces the
//! consumed entries with the substituted conclusion.
//!
//! The engine supports nested transactions through [`ProofEngine::checkpoint`],
//! [`ProofEngine::commit`] and [`ProofEngine::rollback`], so that a proof
//! search can try a step and back out of it.

use crate::error::{ProofError, ProofResult};
use mmkit_core::{Assertion, DistinctPair, LabTok, Library, Sentence, SymTok};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Derivation tree of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofTree {
    /// Sentence derived at this node
    pub sentence: Sentence,
    /// Label of the step, `None` for sentences pushed without a label
    pub label: Option<LabTok>,
    /// `false` for the derivation of a floating hypothesis of the parent
    pub essential: bool,
    /// Sub-derivations in the assertion's mandatory hypothesis order
    pub children: Vec<ProofTree>,
}

impl ProofTree {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(sentence: Sentence, label: Option<LabTok>) -> Self {
        Self {
            sentence,
            label,
            essential: true,
            children: Vec::new(),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }

    /// Length of the longest root to leaf path, counted in nodes.
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(Self::height).max().unwrap_or(0)
    }

    /// Labels in post-order, which is the order an uncompressed proof lists them.
    #[must_use]
    pub fn postorder_labels(&self) -> Vec<LabTok> {
        let mut labels = Vec::with_capacity(self.size());
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels(&self, out: &mut Vec<LabTok>) {
        for child in &self.children {
            child.collect_labels(out);
        }
        out.extend(self.label);
    }
}

/// What a successful proof run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutcome {
    /// Every processed label in order
    pub proof_labels: Vec<LabTok>,
    /// Distinct variable pairs the proof relies on
    pub distinct: BTreeSet<DistinctPair>,
    /// Derivation tree, when requested
    pub proof_tree: Option<ProofTree>,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    stack_depth: usize,
    distinct: BTreeSet<DistinctPair>,
    proof_len: usize,
}

/// The proof stack machine.
pub struct ProofEngine<'a, L: Library + ?Sized> {
    lib: &'a L,
    stack: Vec<Sentence>,
    distinct: BTreeSet<DistinctPair>,
    proof_labels: Vec<LabTok>,
    tree_stack: Option<Vec<ProofTree>>,
    checkpoints: Vec<Checkpoint>,
}

impl<'a, L: Library + ?Sized> ProofEngine<'a, L> {
    /// Create an empty engine over `lib`.
    #[must_use]
    pub fn new(lib: &'a L) -> Self {
        Self {
            lib,
            stack: Vec::new(),
            distinct: BTreeSet::new(),
            proof_labels: Vec::new(),
            tree_stack: None,
            checkpoints: Vec::new(),
        }
    }

    /// Enable or disable derivation tree generation.
    #[must_use]
    pub fn with_proof_tree(mut self, enabled: bool) -> Self {
        self.tree_stack = enabled.then(Vec::new);
        self
    }

    /// Push a sentence verbatim.
    pub fn process_sentence(&mut self, sentence: Sentence, label: Option<LabTok>) {
        if let Some(trees) = &mut self.tree_stack {
            trees.push(ProofTree::leaf(sentence.clone(), label));
        }
        self.stack.push(sentence);
        self.proof_labels.extend(label);
    }

    /// Process one proof step: apply an assertion or push a hypothesis.
    pub fn process_label(&mut self, label: LabTok) -> ProofResult<()> {
        let lib = self.lib;
        match lib.assertion_of(label) {
            Some(child) => self.process_assertion(child, label),
            None => {
                self.process_sentence(lib.sentence_of(label).clone(), Some(label));
                Ok(())
            }
        }
    }

    /// Apply `child` to the top of the stack.
    ///
    /// On error the engine is left exactly as it was.
    pub fn process_assertion(&mut self, child: &Assertion, label: LabTok) -> ProofResult<()> {
        let lib = self.lib;
        let float_num = child.float_hyps().len();
        let hyps_num = child.mand_hyps_num();
        if self.stack.len() < hyps_num {
            return Err(ProofError::StackUnderflow {
                label: lib.resolve_label(label).to_string(),
                needed: hyps_num,
                found: self.stack.len(),
            });
        }
        let base = self.stack.len() - hyps_num;

        let mut subst: FxHashMap<SymTok, &[SymTok]> = FxHashMap::default();
        for (i, &hyp) in child.float_hyps().iter().enumerate() {
            let hyp_sent = lib.sentence_of(hyp);
            let entry = &self.stack[base + i];
            match entry.split_first() {
                Some((&typecode, body)) if typecode == hyp_sent[0] => {
                    subst.insert(hyp_sent[1], body);
                }
                _ => {
                    return Err(ProofError::FloatingMismatch {
                        label: lib.resolve_label(label).to_string(),
                        hyp: lib.resolve_label(hyp).to_string(),
                        expected: lib.resolve_symbol(hyp_sent[0]).to_string(),
                        found: lib.format_sentence(entry),
                    });
                }
            }
        }

        let mut new_dists = Vec::new();
        for pair in child.mand_dists() {
            let (Some(&first), Some(&second)) =
                (subst.get(&pair.first()), subst.get(&pair.second()))
            else {
                continue;
            };
            for &t1 in first.iter().filter(|&&t| !lib.is_constant(t)) {
                for &t2 in second.iter().filter(|&&t| !lib.is_constant(t)) {
                    if t1 == t2 {
                        return Err(ProofError::DistinctVariableViolation {
                            label: lib.resolve_label(label).to_string(),
                            first: lib.resolve_symbol(pair.first()).to_string(),
                            second: lib.resolve_symbol(pair.second()).to_string(),
                            var: lib.resolve_symbol(t1).to_string(),
                        });
                    }
                    new_dists.push(DistinctPair::new(t1, t2));
                }
            }
        }

        for (j, &hyp) in child.ess_hyps().iter().enumerate() {
            self.match_essential(&subst, &self.stack[base + float_num + j], hyp, label)?;
        }

        let mut conclusion = Vec::new();
        for &tok in lib.sentence_of(child.thesis()) {
            match subst.get(&tok) {
                Some(&replacement) => conclusion.extend_from_slice(replacement),
                None => conclusion.push(tok),
            }
        }

        self.truncate_stack(base);
        if let Some(trees) = &mut self.tree_stack {
            let mut children = trees.split_off(base);
            for (i, node) in children.iter_mut().enumerate() {
                node.essential = i >= float_num;
            }
            trees.push(ProofTree {
                sentence: conclusion.clone(),
                label: Some(label),
                essential: true,
                children,
            });
        }
        self.stack.push(conclusion);
        self.distinct.extend(new_dists);
        self.proof_labels.push(label);
        Ok(())
    }

    fn match_essential(
        &self,
        subst: &FxHashMap<SymTok, &[SymTok]>,
        entry: &[SymTok],
        hyp: LabTok,
        label: LabTok,
    ) -> ProofResult<()> {
        let lib = self.lib;
        let mut pos = 0;
        for &tok in lib.sentence_of(hyp) {
            if lib.is_constant(tok) {
                if entry.get(pos) != Some(&tok) {
                    return Err(ProofError::EssentialConstantMismatch {
                        label: lib.resolve_label(label).to_string(),
                        hyp: lib.resolve_label(hyp).to_string(),
                        found: lib.format_sentence(entry),
                    });
                }
                pos += 1;
            } else {
                let Some(&replacement) = subst.get(&tok) else {
                    return Err(ProofError::Internal(format!(
                        "variable `{}` of `{}` has no floating hypothesis",
                        lib.resolve_symbol(tok),
                        lib.resolve_label(hyp)
                    )));
                };
                if entry.get(pos..pos + replacement.len()) != Some(replacement) {
                    return Err(ProofError::EssentialSubstMismatch {
                        label: lib.resolve_label(label).to_string(),
                        hyp: lib.resolve_label(hyp).to_string(),
                        found: lib.format_sentence(entry),
                    });
                }
                pos += replacement.len();
            }
        }
        if pos != entry.len() {
            return Err(ProofError::EssentialLengthMismatch {
                label: lib.resolve_label(label).to_string(),
                hyp: lib.resolve_label(hyp).to_string(),
                found: lib.format_sentence(entry),
            });
        }
        Ok(())
    }

    fn truncate_stack(&mut self, len: usize) {
        if let Some(cp) = self.checkpoints.last() {
            assert!(
                len >= cp.stack_depth,
                "proof stack shrunk to {len} below the checkpoint depth {}",
                cp.stack_depth
            );
        }
        self.stack.truncate(len);
    }

    /// Open a transaction.
    pub fn checkpoint(&mut self) {
        self.checkpoints.push(Checkpoint {
            stack_depth: self.stack.len(),
            distinct: self.distinct.clone(),
            proof_len: self.proof_labels.len(),
        });
    }

    /// Close the innermost transaction keeping its effects.
    ///
    /// # Panics
    ///
    /// Panics when no checkpoint is open.
    pub fn commit(&mut self) {
        assert!(self.checkpoints.pop().is_some(), "commit without an open checkpoint");
    }

    /// Close the innermost transaction discarding its effects.
    ///
    /// # Panics
    ///
    /// Panics when no checkpoint is open.
    pub fn rollback(&mut self) {
        let Some(cp) = self.checkpoints.pop() else {
            panic!("rollback without an open checkpoint");
        };
        self.stack.truncate(cp.stack_depth);
        if let Some(trees) = &mut self.tree_stack {
            trees.truncate(cp.stack_depth);
        }
        self.distinct = cp.distinct;
        self.proof_labels.truncate(cp.proof_len);
    }

    /// Number of open checkpoints.
    #[must_use]
    pub fn checkpoints_num(&self) -> usize {
        self.checkpoints.len()
    }

    /// Current stack, bottom first.
    #[must_use]
    pub fn stack(&self) -> &[Sentence] {
        &self.stack
    }

    /// Distinct variable pairs collected so far.
    #[must_use]
    pub fn distinct(&self) -> &BTreeSet<DistinctPair> {
        &self.distinct
    }

    /// Labels processed so far.
    #[must_use]
    pub fn proof_labels(&self) -> &[LabTok] {
        &self.proof_labels
    }

    /// Derivation tree of the top stack entry.
    #[must_use]
    pub fn proof_tree(&self) -> Option<&ProofTree> {
        self.tree_stack.as_ref().and_then(|trees| trees.last())
    }

    /// Consume the engine, keeping the labels, the distinct pairs and the
    /// tree of the top stack entry.
    #[must_use]
    pub fn into_outcome(self) -> ProofOutcome {
        ProofOutcome {
            proof_labels: self.proof_labels,
            distinct: self.distinct,
            proof_tree: self.tree_stack.and_then(|mut trees| trees.pop()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use mmkit_core::LibraryImpl;

    fn run<'a>(
        lib: &'a LibraryImpl,
        engine: &mut ProofEngine<'a, LibraryImpl>,
        text: &str,
    ) -> ProofResult<()> {
        for name in text.split_whitespace() {
            engine.process_label(lib.label(name).unwrap())?;
        }
        Ok(())
    }

    fn sentence(lib: &LibraryImpl, text: &str) -> Sentence {
        lib.parse_sentence(text).unwrap()
    }

    #[test]
    fn test_process_sentence_records_label() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        let wph = lib.label("wph").unwrap();
        engine.process_sentence(sentence(&lib, "wff ph"), Some(wph));
        engine.process_sentence(sentence(&lib, "wff ps"), None);
        assert_eq!(engine.stack().len(), 2);
        assert_eq!(engine.proof_labels(), &[wph]);
    }

    #[test]
    fn test_syntax_step_builds_tree() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib).with_proof_tree(true);
        run(&lib, &mut engine, "wph wps wi").unwrap();
        assert_eq!(engine.stack(), &[sentence(&lib, "wff ( ph -> ps )")]);

        let tree = engine.proof_tree().unwrap();
        assert_eq!(tree.label, lib.label("wi"));
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children.iter().all(|c| !c.essential));
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_modus_ponens() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib).with_proof_tree(true);
        engine.process_sentence(sentence(&lib, "wff ph"), None);
        engine.process_sentence(sentence(&lib, "wff ( ps -> ph )"), None);
        engine.process_sentence(sentence(&lib, "|- ph"), None);
        engine.process_sentence(sentence(&lib, "|- ( ph -> ( ps -> ph ) )"), None);
        let mp = lib.label("ax-mp").unwrap();
        engine.process_label(mp).unwrap();
        assert_eq!(engine.stack(), &[sentence(&lib, "|- ( ps -> ph )")]);

        let tree = engine.proof_tree().unwrap();
        let flags: Vec<bool> = tree.children.iter().map(|c| c.essential).collect();
        assert_eq!(flags, vec![false, false, true, true]);
    }

    #[test]
    fn test_stack_underflow() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        let err = run(&lib, &mut engine, "wph wi").unwrap_err();
        assert!(matches!(err, ProofError::StackUnderflow { needed: 2, found: 1, .. }));
        assert_eq!(engine.stack().len(), 1);
    }

    #[test]
    fn test_floating_mismatch_leaves_state_unchanged() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        run(&lib, &mut engine, "wph vx").unwrap();
        let before = engine.stack().to_vec();
        let err = run(&lib, &mut engine, "wi").unwrap_err();
        assert!(matches!(err, ProofError::FloatingMismatch { .. }));
        assert_eq!(engine.stack(), before.as_slice());
        assert_eq!(engine.proof_labels().len(), 2);
    }

    #[test]
    fn test_essential_mismatches() {
        let lib = test_support::library();
        let mp = lib.label("ax-mp").unwrap();
        let cases = [
            ("wff ph", "|- ( ph -> ps )", "constant"),
            ("|- ph", "|- ( ps -> ps )", "subst"),
            ("|- ph", "|- ( ph -> ps ) )", "length"),
        ];
        for (min, maj, kind) in cases {
            let mut engine = ProofEngine::new(&lib);
            run(&lib, &mut engine, "wph wps").unwrap();
            engine.process_sentence(sentence(&lib, min), None);
            engine.process_sentence(sentence(&lib, maj), None);
            let err = engine.process_label(mp).unwrap_err();
            let ok = match kind {
                "constant" => matches!(err, ProofError::EssentialConstantMismatch { .. }),
                "subst" => matches!(err, ProofError::EssentialSubstMismatch { .. }),
                _ => matches!(err, ProofError::EssentialLengthMismatch { .. }),
            };
            assert!(ok, "{kind}: {err}");
            assert_eq!(engine.stack().len(), 4);
        }
    }

    #[test]
    fn test_distinct_variables() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        run(&lib, &mut engine, "vz vx ax-dv").unwrap();
        let x = lib.symbol("x").unwrap();
        let z = lib.symbol("z").unwrap();
        assert_eq!(
            engine.distinct().iter().copied().collect::<Vec<_>>(),
            vec![DistinctPair::new(z, x)]
        );

        let mut engine = ProofEngine::new(&lib);
        let err = run(&lib, &mut engine, "vx vx ax-dv").unwrap_err();
        assert!(matches!(err, ProofError::DistinctVariableViolation { ref var, .. } if var == "x"));
        assert!(engine.distinct().is_empty());
    }

    #[test]
    fn test_rollback_restores_state() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib).with_proof_tree(true);
        run(&lib, &mut engine, "vx").unwrap();
        engine.checkpoint();
        run(&lib, &mut engine, "vy vz ax-dv wph").unwrap();
        assert_eq!(engine.stack().len(), 3);
        assert_eq!(engine.distinct().len(), 1);
        engine.rollback();
        assert_eq!(engine.stack(), &[sentence(&lib, "set x")]);
        assert!(engine.distinct().is_empty());
        assert_eq!(engine.proof_labels(), &[lib.label("vx").unwrap()]);
        assert_eq!(engine.proof_tree().unwrap().sentence, sentence(&lib, "set x"));
    }

    #[test]
    fn test_nested_checkpoints() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        engine.checkpoint();
        run(&lib, &mut engine, "wph").unwrap();
        engine.checkpoint();
        run(&lib, &mut engine, "wps").unwrap();
        engine.commit();
        assert_eq!(engine.checkpoints_num(), 1);
        assert_eq!(engine.stack().len(), 2);
        engine.rollback();
        assert!(engine.stack().is_empty());
        assert!(engine.proof_labels().is_empty());
    }

    #[test]
    #[should_panic(expected = "rollback without an open checkpoint")]
    fn test_rollback_without_checkpoint_panics() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        engine.rollback();
    }

    #[test]
    #[should_panic(expected = "commit without an open checkpoint")]
    fn test_commit_without_checkpoint_panics() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        engine.commit();
    }

    #[test]
    #[should_panic(expected = "below the checkpoint depth")]
    fn test_consuming_below_checkpoint_panics() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib);
        run(&lib, &mut engine, "wph").unwrap();
        engine.checkpoint();
        let _ = run(&lib, &mut engine, "wps wi");
    }

    #[test]
    fn test_into_outcome() {
        let lib = test_support::library();
        let mut engine = ProofEngine::new(&lib).with_proof_tree(true);
        run(&lib, &mut engine, "wph wph wi").unwrap();
        let outcome = engine.into_outcome();
        assert_eq!(outcome.proof_labels.len(), 3);
        let tree = outcome.proof_tree.unwrap();
        assert_eq!(tree.postorder_labels(), outcome.proof_labels);
    }
}
