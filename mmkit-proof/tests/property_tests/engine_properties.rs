//! Property-based tests for engine transactions
//!
//! - A rolled back transaction leaves no trace
//! - A committed transaction equals running the steps directly

use super::wff_proof_strategy;
use crate::common::{labels, library};
use mmkit_core::Library;
use mmkit_proof::ProofEngine;
use proptest::prelude::*;

proptest! {
    /// Test that rollback restores the state at the checkpoint
    #[test]
    fn rollback_restores_state(
        prefix in wff_proof_strategy(),
        suffix in wff_proof_strategy(),
    ) {
        let lib = library();
        let mut engine = ProofEngine::new(&lib).with_proof_tree(true);
        for label in labels(&lib, &prefix.join(" ")) {
            engine.process_label(label).unwrap();
        }
        let stack = engine.stack().to_vec();
        let proof_labels = engine.proof_labels().to_vec();
        let tree = engine.proof_tree().cloned();

        engine.checkpoint();
        for label in labels(&lib, &suffix.join(" ")) {
            engine.process_label(label).unwrap();
        }
        engine.rollback();

        prop_assert_eq!(engine.stack(), stack.as_slice());
        prop_assert_eq!(engine.proof_labels(), proof_labels.as_slice());
        prop_assert_eq!(engine.proof_tree().cloned(), tree);
        prop_assert_eq!(engine.checkpoints_num(), 0);
    }

    /// Test that commit keeps the effects of the transaction
    #[test]
    fn commit_keeps_effects(
        prefix in wff_proof_strategy(),
        suffix in wff_proof_strategy(),
    ) {
        let lib = library();
        let all = labels(&lib, &format!("{} {}", prefix.join(" "), suffix.join(" ")));

        let mut direct = ProofEngine::new(&lib);
        for &label in &all {
            direct.process_label(label).unwrap();
        }

        let mut transacted = ProofEngine::new(&lib);
        for &label in &all[..prefix.len()] {
            transacted.process_label(label).unwrap();
        }
        transacted.checkpoint();
        for &label in &all[prefix.len()..] {
            transacted.process_label(label).unwrap();
        }
        transacted.commit();

        prop_assert_eq!(transacted.stack(), direct.stack());
        prop_assert_eq!(transacted.proof_labels(), direct.proof_labels());
    }

    /// Test that a failed step leaves the engine unchanged
    #[test]
    fn failed_step_is_atomic(proof in wff_proof_strategy()) {
        let lib = library();
        let mut engine = ProofEngine::new(&lib);
        for label in labels(&lib, &proof.join(" ")) {
            engine.process_label(label).unwrap();
        }
        let before = engine.stack().to_vec();
        let mp = lib.label("ax-mp").unwrap();
        prop_assert!(engine.process_label(mp).is_err());
        prop_assert_eq!(engine.stack(), before.as_slice());
    }
}
