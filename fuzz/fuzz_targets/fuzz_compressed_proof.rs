//! Fuzz target for decompression and execution of compressed proofs
//!
//! Builds a small implicational library and runs arbitrary reference lists
//! and code streams against it under a tight expansion cap.

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mmkit_core::{Assertion, CompressedProof, LabTok, LibraryImpl, Proof, SentenceType};
use mmkit_proof::{CompressionStrategy, ProofExecutor};

#[derive(Debug, Arbitrary)]
struct Input {
    refs: Vec<u8>,
    codes: Vec<u16>,
}

struct Fixture {
    lib: LibraryImpl,
    host: Assertion,
    candidates: Vec<LabTok>,
}

fn fixture() -> Option<Fixture> {
    let mut lib = LibraryImpl::new();
    for c in ["(", ")", "->", "wff", "|-"] {
        lib.create_symbol(c, true).ok()?;
    }
    lib.create_symbol("ph", false).ok()?;
    lib.create_symbol("ps", false).ok()?;
    let wph = lib.add_statement("wph", "wff ph", SentenceType::FloatingHyp).ok()?;
    let wps = lib.add_statement("wps", "wff ps", SentenceType::FloatingHyp).ok()?;
    let wi = lib
        .add_statement("wi", "wff ( ph -> ps )", SentenceType::Axiom)
        .ok()?;
    lib.add_assertion(wi, Assertion::axiom(wi, vec![wph, wps], vec![], []))
        .ok()?;
    let min = lib.add_statement("min", "|- ph", SentenceType::EssentialHyp).ok()?;
    let maj = lib
        .add_statement("maj", "|- ( ph -> ps )", SentenceType::EssentialHyp)
        .ok()?;
    let mp = lib.add_statement("ax-mp", "|- ps", SentenceType::Axiom).ok()?;
    lib.add_assertion(mp, Assertion::axiom(mp, vec![wph, wps], vec![min, maj], []))
        .ok()?;
    let th = lib
        .add_statement("th", "wff ( ph -> ps )", SentenceType::Proposition)
        .ok()?;
    let host = Assertion::theorem(th, vec![wph, wps], vec![], [], None);
    Some(Fixture {
        lib,
        host,
        candidates: vec![wph, wps, wi, mp],
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(fx) = fixture() else {
        return;
    };
    let mut unstructured = Unstructured::new(data);
    let Ok(input) = Input::arbitrary(&mut unstructured) else {
        return;
    };

    let refs = input
        .refs
        .iter()
        .take(8)
        .map(|&i| fx.candidates[usize::from(i) % fx.candidates.len()])
        .collect();
    let codes = input.codes.iter().take(256).map(|&c| u32::from(c)).collect();
    let proof: Proof = CompressedProof::new(refs, codes).into();

    let executor = ProofExecutor::new(&fx.lib, &fx.host, &proof).with_max_labels(4096);
    if executor.check_syntax().is_err() {
        return;
    }
    // Anything that expands must also run or fail cleanly.
    if let Ok(labels) = executor.uncompress() {
        assert!(labels.len() <= 4096);
        let _ = executor.run();
        if executor.execute().is_ok() {
            let _ = executor.compress(CompressionStrategy::BackrefsOnIdenticalTree);
        }
    }
});
