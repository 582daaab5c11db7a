//! Expansion and construction of compressed proofs.
//!
//! Codes `1..=m` stand for the mandatory hypotheses of the proven assertion,
//! `m+1..=m+r` for the explicit references and `m+r+k+1` for the `k`-th saved
//! step. A saved step is the whole sub-proof that produced the stack entry on
//! top when the `Z` was read.
//!
//! Compression runs two passes over the derivation tree in the same order and
//! with the same pruning decisions. The first numbers the references and
//! finds repeated subtrees; the second emits codes and saves each repeated
//! subtree at its first occurrence.

use crate::engine::ProofTree;
use crate::error::{ProofError, ProofResult};
use mmkit_core::{Assertion, CodeTok, CompressedProof, LabTok, Library, Sentence};
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;

/// Default cap on the number of labels a compressed proof may expand to.
pub const DEFAULT_MAX_LABELS: usize = 1024 * 1024;

/// Streaming expansion of a compressed code sequence into labels.
///
/// The emitted labels live in one append-only buffer and saved steps are
/// ranges into it, so memory never exceeds the label cap.
pub struct Decompressor<'a, L: Library + ?Sized> {
    lib: &'a L,
    assertion: &'a Assertion,
    refs: &'a [LabTok],
    max_labels: usize,
    labels: Vec<LabTok>,
    openings: Vec<usize>,
    saved: Vec<Range<usize>>,
}

impl<'a, L: Library + ?Sized> Decompressor<'a, L> {
    /// Create a decompressor for a proof of `assertion` with references `refs`.
    #[must_use]
    pub fn new(lib: &'a L, assertion: &'a Assertion, refs: &'a [LabTok]) -> Self {
        Self {
            lib,
            assertion,
            refs,
            max_labels: DEFAULT_MAX_LABELS,
            labels: Vec::new(),
            openings: Vec::new(),
            saved: Vec::new(),
        }
    }

    /// Set the cap on emitted labels.
    #[must_use]
    pub fn with_max_labels(mut self, max_labels: usize) -> Self {
        self.max_labels = max_labels;
        self
    }

    /// Process one code and return the range of labels it emitted.
    pub fn push_code(&mut self, code: CodeTok) -> ProofResult<Range<usize>> {
        let hyps_num = self.assertion.mand_hyps_num();
        let refs_num = self.refs.len();
        let code = code as usize;
        if code == 0 {
            let Some(&start) = self.openings.last() else {
                return Err(ProofError::SyntaxError(
                    "save marker before any proof step".to_string(),
                ));
            };
            self.saved.push(start..self.labels.len());
            let end = self.labels.len();
            return Ok(end..end);
        }
        if code <= hyps_num {
            let label = self.mand_hyp(code - 1)?;
            return self.emit_label(label);
        }
        if code <= hyps_num + refs_num {
            return self.emit_label(self.refs[code - hyps_num - 1]);
        }
        match self.saved.get(code - hyps_num - refs_num - 1) {
            Some(span) => {
                let span = span.clone();
                let start = self.labels.len();
                if start + span.len() > self.max_labels {
                    return Err(ProofError::ProofTooLarge {
                        limit: self.max_labels,
                    });
                }
                self.openings.push(start);
                self.labels.extend_from_within(span);
                Ok(start..self.labels.len())
            }
            None => Err(ProofError::SyntaxError(format!(
                "code {code} refers to a step that was never saved"
            ))),
        }
    }

    fn mand_hyp(&self, index: usize) -> ProofResult<LabTok> {
        self.assertion
            .mand_hyp(index)
            .ok_or_else(|| ProofError::Internal(format!("no mandatory hypothesis {index}")))
    }

    fn emit_label(&mut self, label: LabTok) -> ProofResult<Range<usize>> {
        let start = self.labels.len();
        if start + 1 > self.max_labels {
            return Err(ProofError::ProofTooLarge {
                limit: self.max_labels,
            });
        }
        let args = self
            .lib
            .assertion_of(label)
            .map_or(0, Assertion::mand_hyps_num);
        if self.openings.len() < args {
            return Err(ProofError::StackUnderflow {
                label: self.lib.resolve_label(label).to_string(),
                needed: args,
                found: self.openings.len(),
            });
        }
        let keep = self.openings.len() - args;
        let opening = self.openings.get(keep).copied().unwrap_or(start);
        self.openings.truncate(keep);
        self.openings.push(opening);
        self.labels.push(label);
        Ok(start..start + 1)
    }

    /// Labels emitted so far.
    #[must_use]
    pub fn labels(&self) -> &[LabTok] {
        &self.labels
    }

    /// Number of completed sub-proofs currently open.
    #[must_use]
    pub fn open_spans(&self) -> usize {
        self.openings.len()
    }

    /// Finish a whole proof, which must have left exactly one open span.
    pub fn finish(self) -> ProofResult<Vec<LabTok>> {
        if self.openings.len() != 1 {
            return Err(ProofError::StackShapeError {
                depth: self.openings.len(),
            });
        }
        Ok(self.labels)
    }
}

/// Expand a compressed proof into its labels.
pub fn decompress<L: Library + ?Sized>(
    lib: &L,
    assertion: &Assertion,
    proof: &CompressedProof,
    max_labels: usize,
) -> ProofResult<Vec<LabTok>> {
    let mut decompressor =
        Decompressor::new(lib, assertion, proof.refs()).with_max_labels(max_labels);
    for &code in proof.codes() {
        decompressor.push_code(code)?;
    }
    decompressor.finish()
}

/// Number labels in order of appearance, without back-references.
#[must_use]
pub fn compress_labels(assertion: &Assertion, labels: &[LabTok]) -> CompressedProof {
    let mut numbering = Numbering::new(assertion);
    let codes = labels.iter().map(|&label| numbering.code_of(label)).collect();
    CompressedProof::new(numbering.refs, codes)
}

/// What identifies two subtrees as interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackrefKey {
    /// Same derived sentence
    Sentence,
    /// Same labels in the same shape
    Structure,
}

/// Build a compressed proof from a derivation tree, saving every repeated
/// subtree once and referring back to it afterwards.
pub fn compress_tree(
    assertion: &Assertion,
    tree: &ProofTree,
    key: BackrefKey,
) -> ProofResult<CompressedProof> {
    let mut interner = KeyInterner::default();
    let root = interner.annotate(tree, key)?;

    let mut numbering = Numbering::new(assertion);
    let mut seen = FxHashSet::default();
    let mut dupls = FxHashSet::default();
    collect_refs(&root, &mut numbering, &mut seen, &mut dupls);

    let mut emitter = Emitter {
        numbering: &numbering,
        dupls: &dupls,
        seen: FxHashSet::default(),
        saved: FxHashMap::default(),
        codes: Vec::new(),
    };
    emitter.emit(&root)?;
    let codes = emitter.codes;
    Ok(CompressedProof::new(numbering.refs, codes))
}

struct Numbering {
    codes: FxHashMap<LabTok, CodeTok>,
    refs: Vec<LabTok>,
    next: CodeTok,
}

impl Numbering {
    fn new(assertion: &Assertion) -> Self {
        let mut codes = FxHashMap::default();
        let mut next = 1;
        for hyp in assertion.mand_hyps() {
            codes.insert(hyp, next);
            next += 1;
        }
        Self {
            codes,
            refs: Vec::new(),
            next,
        }
    }

    fn code_of(&mut self, label: LabTok) -> CodeTok {
        if let Some(&code) = self.codes.get(&label) {
            return code;
        }
        let code = self.next;
        self.next += 1;
        self.codes.insert(label, code);
        self.refs.push(label);
        code
    }
}

struct KeyedNode {
    key: usize,
    label: LabTok,
    children: Vec<KeyedNode>,
}

#[derive(Default)]
struct KeyInterner {
    sentences: FxHashMap<Sentence, usize>,
    shapes: FxHashMap<(LabTok, Vec<usize>), usize>,
}

impl KeyInterner {
    fn annotate(&mut self, tree: &ProofTree, key: BackrefKey) -> ProofResult<KeyedNode> {
        let Some(label) = tree.label else {
            return Err(ProofError::Internal(
                "cannot compress a step without a label".to_string(),
            ));
        };
        let children = tree
            .children
            .iter()
            .map(|child| self.annotate(child, key))
            .collect::<ProofResult<Vec<_>>>()?;
        let key = match key {
            BackrefKey::Sentence => {
                let next = self.sentences.len();
                *self.sentences.entry(tree.sentence.clone()).or_insert(next)
            }
            BackrefKey::Structure => {
                let next = self.shapes.len();
                let shape = (label, children.iter().map(|c| c.key).collect());
                *self.shapes.entry(shape).or_insert(next)
            }
        };
        Ok(KeyedNode {
            key,
            label,
            children,
        })
    }
}

fn collect_refs(
    node: &KeyedNode,
    numbering: &mut Numbering,
    seen: &mut FxHashSet<usize>,
    dupls: &mut FxHashSet<usize>,
) {
    if !node.children.is_empty() && seen.contains(&node.key) {
        dupls.insert(node.key);
        return;
    }
    for child in &node.children {
        collect_refs(child, numbering, seen, dupls);
    }
    numbering.code_of(node.label);
    seen.insert(node.key);
}

struct Emitter<'n> {
    numbering: &'n Numbering,
    dupls: &'n FxHashSet<usize>,
    seen: FxHashSet<usize>,
    saved: FxHashMap<usize, CodeTok>,
    codes: Vec<CodeTok>,
}

impl Emitter<'_> {
    fn emit(&mut self, node: &KeyedNode) -> ProofResult<()> {
        if !node.children.is_empty() && self.seen.contains(&node.key) {
            let Some(&code) = self.saved.get(&node.key) else {
                return Err(ProofError::Internal(
                    "repeated subtree was never saved".to_string(),
                ));
            };
            self.codes.push(code);
            return Ok(());
        }
        for child in &node.children {
            self.emit(child)?;
        }
        let Some(&code) = self.numbering.codes.get(&node.label) else {
            return Err(ProofError::Internal("label missing from numbering".to_string()));
        };
        self.codes.push(code);
        if self.dupls.contains(&node.key) && !self.saved.contains_key(&node.key) {
            let slot = self.numbering.next + self.saved.len() as CodeTok;
            self.saved.insert(node.key, slot);
            self.codes.push(0);
        }
        self.seen.insert(node.key);
        Ok(())
    }
}
