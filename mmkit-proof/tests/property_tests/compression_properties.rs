//! Property-based tests for proof compression
//!
//! - Every strategy round-trips through decompression
//! - Compressed proofs derive the same sentence as their source
//! - Compression is deterministic

use super::wff_proof_strategy;
use crate::common::{labels, library};
use mmkit_core::{Assertion, Library, Proof, UncompressedProof};
use mmkit_proof::{CompressionStrategy, ProofExecutor};
use proptest::prelude::*;

/// Strategy for picking a compression strategy
fn strategy_strategy() -> impl Strategy<Value = CompressionStrategy> {
    prop_oneof![
        Just(CompressionStrategy::Any),
        Just(CompressionStrategy::NoBackrefs),
        Just(CompressionStrategy::BackrefsOnIdenticalSentence),
        Just(CompressionStrategy::BackrefsOnIdenticalTree),
    ]
}

proptest! {
    /// Test that compressing and expanding returns the original labels
    #[test]
    fn compression_round_trip(
        names in wff_proof_strategy(),
        strategy in strategy_strategy(),
    ) {
        let lib = library();
        let wph = lib.label("wph").unwrap();
        let wps = lib.label("wps").unwrap();
        let wch = lib.label("wch").unwrap();
        // Any label declared after `wi` can host the proof.
        let host = lib.label("wnest").unwrap();
        let ass = Assertion::theorem(host, vec![wph, wps, wch], vec![], [], None);

        let original = UncompressedProof::new(labels(&lib, &names.join(" ")));
        let proof: Proof = original.clone().into();
        let executor = ProofExecutor::new(&lib, &ass, &proof);
        let compressed: Proof = executor.compress(strategy).unwrap().into();

        let back = ProofExecutor::new(&lib, &ass, &compressed);
        back.check_syntax().unwrap();
        prop_assert_eq!(back.uncompress().unwrap(), original);
        let replayed = back.execute().unwrap();
        let direct = executor.execute().unwrap();
        prop_assert_eq!(replayed.stack(), direct.stack());
        prop_assert_eq!(executor.compress(strategy).unwrap(), executor.compress(strategy).unwrap());
    }

    /// Test that back-references never make a proof longer
    #[test]
    fn backrefs_do_not_grow_proofs(names in wff_proof_strategy()) {
        let lib = library();
        let wph = lib.label("wph").unwrap();
        let wps = lib.label("wps").unwrap();
        let wch = lib.label("wch").unwrap();
        let host = lib.label("wnest").unwrap();
        let ass = Assertion::theorem(host, vec![wph, wps, wch], vec![], [], None);

        let proof: Proof = UncompressedProof::new(labels(&lib, &names.join(" "))).into();
        let executor = ProofExecutor::new(&lib, &ass, &proof);
        let plain = executor.compress(CompressionStrategy::NoBackrefs).unwrap();
        let by_tree = executor.compress(CompressionStrategy::BackrefsOnIdenticalTree).unwrap();
        prop_assert!(by_tree.codes().len() <= plain.codes().len() + by_tree.saved_steps());
    }
}
