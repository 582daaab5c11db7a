//! Symbol and label tables.
//!
//! [`Library`] is the read-only view the proof engine consumes.
//! [`LibraryImpl`] is the in-memory table behind it, built either through its
//! builder methods or loaded from a JSON snapshot written by an external
//! statement reader.

use crate::assertion::Assertion;
use crate::error::{LibraryError, LibraryResult};
use crate::proof::Proof;
use crate::token::{LabTok, Sentence, SymTok};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Read access to a fully built library.
///
/// Lookups on tokens that the library never produced panic: that is a bug in
/// whoever built the library, not a proof failure.
pub trait Library {
    /// Sentence stored under `label`.
    fn sentence_of(&self, label: LabTok) -> &Sentence;

    /// Assertion stored under `label`, `None` for hypotheses.
    fn assertion_of(&self, label: LabTok) -> Option<&Assertion>;

    /// Check whether `sym` is a constant.
    fn is_constant(&self, sym: SymTok) -> bool;

    /// Name of a symbol.
    fn resolve_symbol(&self, sym: SymTok) -> &str;

    /// Name of a label.
    fn resolve_label(&self, label: LabTok) -> &str;

    /// Look a symbol up by name.
    fn symbol(&self, name: &str) -> Option<SymTok>;

    /// Look a label up by name.
    fn label(&self, name: &str) -> Option<LabTok>;

    /// All assertions in declaration order.
    fn assertions(&self) -> Box<dyn Iterator<Item = (LabTok, &Assertion)> + '_>;

    /// Number of labels.
    fn labels_num(&self) -> usize;

    /// Render a sentence with symbol names separated by single spaces.
    fn format_sentence(&self, sentence: &[SymTok]) -> String {
        let names: Vec<&str> = sentence.iter().map(|&s| self.resolve_symbol(s)).collect();
        names.join(" ")
    }
}

/// The kind of statement a label names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceType {
    /// `$f` statement
    FloatingHyp,
    /// `$e` statement
    EssentialHyp,
    /// `$a` statement
    Axiom,
    /// `$p` statement
    Proposition,
}

impl SentenceType {
    /// Check whether the sentence is a hypothesis.
    #[must_use]
    pub fn is_hypothesis(self) -> bool {
        matches!(self, Self::FloatingHyp | Self::EssentialHyp)
    }

    /// Short name for reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FloatingHyp => "floating",
            Self::EssentialHyp => "essential",
            Self::Axiom => "axiom",
            Self::Proposition => "proposition",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SymbolEntry {
    name: String,
    constant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LabelEntry {
    name: String,
    #[serde(default)]
    sentence: Option<Sentence>,
    #[serde(default, rename = "type")]
    sentence_type: Option<SentenceType>,
    #[serde(default)]
    assertion: Option<Assertion>,
}

/// In-memory symbol and label table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryImpl {
    symbols: Vec<SymbolEntry>,
    labels: Vec<LabelEntry>,
    #[serde(skip)]
    symbol_index: FxHashMap<String, SymTok>,
    #[serde(skip)]
    label_index: FxHashMap<String, LabTok>,
}

impl LibraryImpl {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new symbol.
    pub fn create_symbol(&mut self, name: &str, constant: bool) -> LibraryResult<SymTok> {
        if self.symbol_index.contains_key(name) {
            return Err(LibraryError::DuplicateName(name.to_string()));
        }
        let tok = SymTok::from_index(self.symbols.len());
        self.symbols.push(SymbolEntry {
            name: name.to_string(),
            constant,
        });
        self.symbol_index.insert(name.to_string(), tok);
        Ok(tok)
    }

    /// Register a new label with no sentence yet.
    pub fn create_label(&mut self, name: &str) -> LibraryResult<LabTok> {
        if self.label_index.contains_key(name) {
            return Err(LibraryError::DuplicateName(name.to_string()));
        }
        let tok = LabTok::from_index(self.labels.len());
        self.labels.push(LabelEntry {
            name: name.to_string(),
            sentence: None,
            sentence_type: None,
            assertion: None,
        });
        self.label_index.insert(name.to_string(), tok);
        Ok(tok)
    }

    /// Attach a sentence to a label.
    pub fn add_sentence(
        &mut self,
        label: LabTok,
        sentence: Sentence,
        sentence_type: SentenceType,
    ) -> LibraryResult<()> {
        if let Some(&sym) = sentence.iter().find(|s| s.index() >= self.symbols.len()) {
            return Err(LibraryError::UnknownToken(sym.to_string()));
        }
        let entry = self.label_entry_mut(label)?;
        entry.sentence = Some(sentence);
        entry.sentence_type = Some(sentence_type);
        Ok(())
    }

    /// Create a label, parse `text` and attach it in one go.
    pub fn add_statement(
        &mut self,
        name: &str,
        text: &str,
        sentence_type: SentenceType,
    ) -> LibraryResult<LabTok> {
        let sentence = self.parse_sentence(text)?;
        let label = self.create_label(name)?;
        self.add_sentence(label, sentence, sentence_type)?;
        Ok(label)
    }

    /// Attach the assertion whose thesis is `label`.
    pub fn add_assertion(&mut self, label: LabTok, assertion: Assertion) -> LibraryResult<()> {
        if assertion.thesis() != label {
            let name = self.label_entry(label)?.name.clone();
            return Err(LibraryError::invariant(name, "assertion thesis is another label"));
        }
        self.label_entry_mut(label)?.assertion = Some(assertion);
        Ok(())
    }

    /// Replace the proof of an existing theorem.
    pub fn set_proof(&mut self, label: LabTok, proof: Proof) -> LibraryResult<()> {
        let entry = self.label_entry_mut(label)?;
        match entry.assertion.take() {
            Some(ass) if ass.is_theorem() => {
                entry.assertion = Some(Assertion::theorem(
                    ass.thesis(),
                    ass.float_hyps().to_vec(),
                    ass.ess_hyps().to_vec(),
                    ass.mand_dists().iter().map(|&p| p.into()),
                    Some(proof),
                )
                .with_opt_hyps(ass.opt_hyps().iter().copied())
                .with_opt_dists(ass.opt_dists().iter().map(|&p| p.into())));
                Ok(())
            }
            other => {
                entry.assertion = other;
                Err(LibraryError::invariant(entry.name.clone(), "not a theorem"))
            }
        }
    }

    /// Parse whitespace separated symbol names.
    pub fn parse_sentence(&self, text: &str) -> LibraryResult<Sentence> {
        text.split_whitespace()
            .map(|name| {
                self.symbol_index
                    .get(name)
                    .copied()
                    .ok_or_else(|| LibraryError::UnknownSymbol(name.to_string()))
            })
            .collect()
    }

    /// Kind of statement stored under `label`.
    #[must_use]
    pub fn sentence_type_of(&self, label: LabTok) -> Option<SentenceType> {
        self.labels.get(label.index()).and_then(|e| e.sentence_type)
    }

    /// Number of symbols.
    #[must_use]
    pub fn symbols_num(&self) -> usize {
        self.symbols.len()
    }

    /// Check every elaboration invariant the proof engine relies on.
    pub fn validate(&self) -> LibraryResult<()> {
        for (i, entry) in self.labels.iter().enumerate() {
            let label = LabTok::from_index(i);
            if let Some(sentence) = &entry.sentence {
                self.validate_sentence(&entry.name, sentence)?;
            }
            match (&entry.assertion, entry.sentence_type) {
                (Some(ass), Some(SentenceType::Axiom | SentenceType::Proposition)) => {
                    self.validate_assertion(label, entry, ass)?;
                }
                (Some(_), _) => {
                    return Err(LibraryError::invariant(
                        &entry.name,
                        "assertion stored on a hypothesis",
                    ));
                }
                (None, Some(SentenceType::Axiom | SentenceType::Proposition)) => {
                    return Err(LibraryError::invariant(&entry.name, "missing assertion"));
                }
                (None, _) => {}
            }
        }
        Ok(())
    }

    fn validate_sentence(&self, name: &str, sentence: &Sentence) -> LibraryResult<()> {
        let Some(&first) = sentence.first() else {
            return Err(LibraryError::invariant(name, "empty sentence"));
        };
        if let Some(sym) = sentence.iter().find(|s| s.index() >= self.symbols.len()) {
            return Err(LibraryError::invariant(name, format!("unknown symbol {sym}")));
        }
        if !self.symbols[first.index()].constant {
            return Err(LibraryError::invariant(name, "sentence must start with a constant"));
        }
        Ok(())
    }

    fn validate_assertion(
        &self,
        label: LabTok,
        entry: &LabelEntry,
        ass: &Assertion,
    ) -> LibraryResult<()> {
        let name = entry.name.as_str();
        if ass.thesis() != label {
            return Err(LibraryError::invariant(name, "assertion thesis is another label"));
        }
        let expect_theorem = entry.sentence_type == Some(SentenceType::Proposition);
        if ass.is_theorem() != expect_theorem {
            return Err(LibraryError::invariant(name, "theorem flag does not match statement type"));
        }
        if !ass.is_theorem() && ass.proof().is_some() {
            return Err(LibraryError::invariant(name, "axiom carries a proof"));
        }
        for &hyp in ass.float_hyps().iter().chain(ass.opt_hyps()) {
            let sentence = self.hyp_sentence(name, hyp, SentenceType::FloatingHyp)?;
            let is_variable = sentence.len() == 2
                && self.symbols.get(sentence[1].index()).is_some_and(|s| !s.constant);
            if !is_variable {
                return Err(LibraryError::invariant(
                    name,
                    format!(
                        "floating hypothesis {} is not `constant variable`",
                        self.labels[hyp.index()].name
                    ),
                ));
            }
        }
        let mut checked: Vec<&Sentence> = entry.sentence.iter().collect();
        for &hyp in ass.ess_hyps() {
            checked.push(self.hyp_sentence(name, hyp, SentenceType::EssentialHyp)?);
        }
        let mut bound = FxHashSet::default();
        for &hyp in ass.float_hyps() {
            bound.insert(self.hyp_sentence(name, hyp, SentenceType::FloatingHyp)?[1]);
        }
        for &sym in checked.into_iter().flatten() {
            if !self.symbols[sym.index()].constant && !bound.contains(&sym) {
                return Err(LibraryError::invariant(
                    name,
                    format!(
                        "variable {} is not bound by a floating hypothesis",
                        self.symbols[sym.index()].name
                    ),
                ));
            }
        }
        for pair in ass.mand_dists().iter().chain(ass.opt_dists()) {
            for sym in [pair.first(), pair.second()] {
                match self.symbols.get(sym.index()) {
                    Some(s) if !s.constant => {}
                    _ => {
                        return Err(LibraryError::invariant(
                            name,
                            format!("distinct pair names non-variable {sym}"),
                        ));
                    }
                }
            }
        }
        let proof_labels: &[LabTok] = match ass.proof() {
            Some(Proof::Uncompressed(p)) => p.labels(),
            Some(Proof::Compressed(p)) => p.refs(),
            None => &[],
        };
        if let Some(tok) = proof_labels.iter().find(|l| l.index() >= self.labels.len()) {
            return Err(LibraryError::invariant(
                name,
                format!("proof references unknown label {tok}"),
            ));
        }
        Ok(())
    }

    fn hyp_sentence(
        &self,
        owner: &str,
        hyp: LabTok,
        expected: SentenceType,
    ) -> LibraryResult<&Sentence> {
        let entry = self
            .labels
            .get(hyp.index())
            .ok_or_else(|| LibraryError::invariant(owner, format!("unknown hypothesis {hyp}")))?;
        match (&entry.sentence, entry.sentence_type) {
            (Some(sentence), Some(ty)) if ty == expected => Ok(sentence),
            _ => Err(LibraryError::invariant(
                owner,
                format!("{} is not a {} hypothesis", entry.name, expected.as_str()),
            )),
        }
    }

    /// Deserialize a snapshot, rebuild the name indexes and validate it.
    pub fn from_json(json: &str) -> LibraryResult<Self> {
        let mut lib: Self = serde_json::from_str(json)?;
        lib.rebuild_indexes()?;
        lib.validate()?;
        Ok(lib)
    }

    /// Serialize the library as a pretty-printed snapshot.
    pub fn to_json(&self) -> LibraryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from disk.
    pub fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write a snapshot to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> LibraryResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn rebuild_indexes(&mut self) -> LibraryResult<()> {
        self.symbol_index.clear();
        self.label_index.clear();
        for (i, sym) in self.symbols.iter().enumerate() {
            if self
                .symbol_index
                .insert(sym.name.clone(), SymTok::from_index(i))
                .is_some()
            {
                return Err(LibraryError::DuplicateName(sym.name.clone()));
            }
        }
        for (i, lab) in self.labels.iter().enumerate() {
            if self
                .label_index
                .insert(lab.name.clone(), LabTok::from_index(i))
                .is_some()
            {
                return Err(LibraryError::DuplicateName(lab.name.clone()));
            }
        }
        Ok(())
    }

    fn label_entry(&self, label: LabTok) -> LibraryResult<&LabelEntry> {
        self.labels
            .get(label.index())
            .ok_or_else(|| LibraryError::UnknownToken(label.to_string()))
    }

    fn label_entry_mut(&mut self, label: LabTok) -> LibraryResult<&mut LabelEntry> {
        self.labels
            .get_mut(label.index())
            .ok_or_else(|| LibraryError::UnknownToken(label.to_string()))
    }
}

impl Library for LibraryImpl {
    fn sentence_of(&self, label: LabTok) -> &Sentence {
        match &self.labels[label.index()].sentence {
            Some(sentence) => sentence,
            None => panic!("label {} has no sentence", self.labels[label.index()].name),
        }
    }

    fn assertion_of(&self, label: LabTok) -> Option<&Assertion> {
        self.labels[label.index()].assertion.as_ref()
    }

    fn is_constant(&self, sym: SymTok) -> bool {
        self.symbols[sym.index()].constant
    }

    fn resolve_symbol(&self, sym: SymTok) -> &str {
        &self.symbols[sym.index()].name
    }

    fn resolve_label(&self, label: LabTok) -> &str {
        &self.labels[label.index()].name
    }

    fn symbol(&self, name: &str) -> Option<SymTok> {
        self.symbol_index.get(name).copied()
    }

    fn label(&self, name: &str) -> Option<LabTok> {
        self.label_index.get(name).copied()
    }

    fn assertions(&self) -> Box<dyn Iterator<Item = (LabTok, &Assertion)> + '_> {
        Box::new(
            self.labels
                .iter()
                .enumerate()
                .filter_map(|(i, e)| e.assertion.as_ref().map(|a| (LabTok::from_index(i), a))),
        )
    }

    fn labels_num(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::UncompressedProof;

    fn small_library() -> (LibraryImpl, LabTok) {
        let mut lib = LibraryImpl::new();
        for c in ["wff", "|-", "(", ")", "->"] {
            lib.create_symbol(c, true).unwrap();
        }
        lib.create_symbol("ph", false).unwrap();
        let wph = lib.add_statement("wph", "wff ph", SentenceType::FloatingHyp).unwrap();
        let th = lib.add_statement("th", "|- ph", SentenceType::Proposition).unwrap();
        let h = lib.add_statement("th.1", "|- ph", SentenceType::EssentialHyp).unwrap();
        let proof = UncompressedProof::new(vec![h]).into();
        lib.add_assertion(th, Assertion::theorem(th, vec![wph], vec![h], [], Some(proof)))
            .unwrap();
        (lib, th)
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut lib = LibraryImpl::new();
        lib.create_symbol("x", false).unwrap();
        assert!(matches!(
            lib.create_symbol("x", true),
            Err(LibraryError::DuplicateName(name)) if name == "x"
        ));
        lib.create_label("a").unwrap();
        assert!(lib.create_label("a").is_err());
    }

    #[test]
    fn test_parse_sentence() {
        let (lib, _) = small_library();
        let sent = lib.parse_sentence("|-  ( ph -> ph )").unwrap();
        assert_eq!(sent.len(), 6);
        assert_eq!(lib.format_sentence(&sent), "|- ( ph -> ph )");
        assert!(matches!(
            lib.parse_sentence("|- qq"),
            Err(LibraryError::UnknownSymbol(name)) if name == "qq"
        ));
    }

    #[test]
    fn test_lookups() {
        let (lib, th) = small_library();
        assert_eq!(lib.label("th"), Some(th));
        assert_eq!(lib.resolve_label(th), "th");
        assert!(lib.assertion_of(th).is_some());
        assert!(lib.assertion_of(lib.label("wph").unwrap()).is_none());
        assert!(lib.is_constant(lib.symbol("|-").unwrap()));
        assert!(!lib.is_constant(lib.symbol("ph").unwrap()));
        assert_eq!(lib.assertions().count(), 1);
        assert_eq!(lib.labels_num(), 3);
        assert_eq!(lib.sentence_type_of(th), Some(SentenceType::Proposition));
    }

    #[test]
    fn test_validate_accepts_well_formed_library() {
        let (lib, _) = small_library();
        lib.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_floating_hypothesis() {
        let (mut lib, _) = small_library();
        let bad = lib.add_statement("wbad", "wff ( ph", SentenceType::FloatingHyp).unwrap();
        let ax = lib.add_statement("ax", "|- ph", SentenceType::Axiom).unwrap();
        lib.add_assertion(ax, Assertion::axiom(ax, vec![bad], vec![], [])).unwrap();
        assert!(matches!(
            lib.validate(),
            Err(LibraryError::Invariant { label, .. }) if label == "ax"
        ));
    }

    #[test]
    fn test_validate_rejects_constant_in_distinct_pair() {
        let (mut lib, _) = small_library();
        let wph = lib.label("wph").unwrap();
        let ph = lib.symbol("ph").unwrap();
        let wff = lib.symbol("wff").unwrap();
        let ax = lib.add_statement("ax", "|- ph", SentenceType::Axiom).unwrap();
        lib.add_assertion(ax, Assertion::axiom(ax, vec![wph], vec![], [(ph, wff)]))
            .unwrap();
        assert!(lib.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbound_thesis_variable() {
        let (mut lib, _) = small_library();
        let ax = lib.add_statement("ax", "|- ph", SentenceType::Axiom).unwrap();
        lib.add_assertion(ax, Assertion::axiom(ax, vec![], vec![], [])).unwrap();
        assert!(matches!(
            lib.validate(),
            Err(LibraryError::Invariant { label, .. }) if label == "ax"
        ));
    }

    #[test]
    fn test_validate_rejects_unbound_essential_variable() {
        let (mut lib, _) = small_library();
        lib.create_symbol("ps", false).unwrap();
        let wph = lib.label("wph").unwrap();
        let hyp = lib.add_statement("ax.1", "|- ps", SentenceType::EssentialHyp).unwrap();
        let ax = lib.add_statement("ax", "|- ph", SentenceType::Axiom).unwrap();
        lib.add_assertion(ax, Assertion::axiom(ax, vec![wph], vec![hyp], [])).unwrap();
        assert!(matches!(
            lib.validate(),
            Err(LibraryError::Invariant { label, .. }) if label == "ax"
        ));
    }

    #[test]
    fn test_assertion_must_match_label() {
        let (mut lib, th) = small_library();
        let other = lib.create_label("other").unwrap();
        assert!(lib.add_assertion(other, Assertion::axiom(th, vec![], vec![], [])).is_err());
    }

    #[test]
    fn test_json_round_trip_rebuilds_indexes() {
        let (lib, th) = small_library();
        let json = lib.to_json().unwrap();
        let loaded = LibraryImpl::from_json(&json).unwrap();
        assert_eq!(loaded.label("th"), Some(th));
        assert_eq!(loaded.symbol("ph"), lib.symbol("ph"));
        assert_eq!(loaded.assertion_of(th), lib.assertion_of(th));
    }

    #[test]
    fn test_set_proof() {
        let (mut lib, th) = small_library();
        let h = lib.label("th.1").unwrap();
        lib.set_proof(th, UncompressedProof::new(vec![h, h]).into()).unwrap();
        match lib.assertion_of(th).and_then(Assertion::proof) {
            Some(Proof::Uncompressed(p)) => assert_eq!(p.len(), 2),
            other => panic!("unexpected proof {other:?}"),
        }
        let wph = lib.label("wph").unwrap();
        assert!(lib.set_proof(wph, UncompressedProof::new(vec![]).into()).is_err());
    }
}
