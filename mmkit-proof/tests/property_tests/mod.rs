//! Property-based tests for mmkit-proof
//!
//! This module contains property-based tests using proptest to check the
//! numeral codec, the engine transactions and proof compression.

mod codec_properties;
mod compression_properties;
mod engine_properties;

use proptest::prelude::*;

/// Strategy for generating syntax proofs of random wff trees over `ph`, `ps`
/// and `ch`, as label names in execution order
pub fn wff_proof_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    let leaf = prop_oneof![Just(vec!["wph"]), Just(vec!["wps"]), Just(vec!["wch"])];
    leaf.prop_recursive(6, 64, 2, |inner| {
        (inner.clone(), inner).prop_map(|(mut left, right)| {
            left.extend(right);
            left.push("wi");
            left
        })
    })
}
