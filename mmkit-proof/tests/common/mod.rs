//! Shared fixture: a small propositional library with a distinct variable axiom.

#![allow(dead_code)]

use mmkit_core::{
    Assertion, CodeTok, CompressedProof, LabTok, Library, LibraryImpl, SentenceType,
    UncompressedProof,
};

pub const ID_PROOF: &str = "wph wph wph wi wi wph wph wi wph wph ax-1 wph wph wph wi wph wi wi \
     wph wph wph wi wi wph wph wi wi wph wph wph wi ax-1 wph wph wph wi wph ax-2 ax-mp ax-mp";

pub const ID_REFS: [&str; 4] = ["wi", "ax-1", "ax-2", "ax-mp"];

pub const ID_CODES: [CodeTok; 28] = [
    1, 1, 1, 2, 0, 2, 0, 6, 1, 1, 3, 1, 6, 1, 2, 2, 7, 6, 2, 1, 6, 3, 1, 6, 1, 4, 5, 5,
];

pub const ID_LETTERS: &str = "AAABZBZFAACAFABBGFBAFCAFADEE";

/// Theorems whose proofs are correct.
pub const GOOD_THEOREMS: [&str; 5] = ["id", "id-c", "mp-inst", "dv-ok", "wnest"];

pub fn labels(lib: &LibraryImpl, text: &str) -> Vec<LabTok> {
    text.split_whitespace()
        .map(|name| lib.label(name).unwrap_or_else(|| panic!("unknown label {name}")))
        .collect()
}

pub fn assertion<'a>(lib: &'a LibraryImpl, name: &str) -> &'a Assertion {
    lib.assertion_of(lib.label(name).unwrap()).unwrap()
}

fn float(lib: &mut LibraryImpl, name: &str, text: &str) -> LabTok {
    lib.add_statement(name, text, SentenceType::FloatingHyp).unwrap()
}

fn essential(lib: &mut LibraryImpl, name: &str, text: &str) -> LabTok {
    lib.add_statement(name, text, SentenceType::EssentialHyp).unwrap()
}

fn axiom(lib: &mut LibraryImpl, name: &str, text: &str, floats: &[LabTok], ess: &[LabTok]) -> LabTok {
    let label = lib.add_statement(name, text, SentenceType::Axiom).unwrap();
    lib.add_assertion(label, Assertion::axiom(label, floats.to_vec(), ess.to_vec(), []))
        .unwrap();
    label
}

fn theorem(lib: &mut LibraryImpl, name: &str, text: &str, build: impl FnOnce(LabTok) -> Assertion) {
    let label = lib.add_statement(name, text, SentenceType::Proposition).unwrap();
    let assertion = build(label);
    lib.add_assertion(label, assertion).unwrap();
}

pub fn library() -> LibraryImpl {
    let mut lib = LibraryImpl::new();
    for c in ["(", ")", "->", "wff", "|-", "set", "dv"] {
        lib.create_symbol(c, true).unwrap();
    }
    for v in ["ph", "ps", "ch", "x", "y", "z"] {
        lib.create_symbol(v, false).unwrap();
    }
    let wph = float(&mut lib, "wph", "wff ph");
    let wps = float(&mut lib, "wps", "wff ps");
    let wch = float(&mut lib, "wch", "wff ch");
    let vx = float(&mut lib, "vx", "set x");
    let vy = float(&mut lib, "vy", "set y");
    let vz = float(&mut lib, "vz", "set z");

    axiom(&mut lib, "wi", "wff ( ph -> ps )", &[wph, wps], &[]);
    axiom(&mut lib, "ax-1", "|- ( ph -> ( ps -> ph ) )", &[wph, wps], &[]);
    axiom(
        &mut lib,
        "ax-2",
        "|- ( ( ph -> ( ps -> ch ) ) -> ( ( ph -> ps ) -> ( ph -> ch ) ) )",
        &[wph, wps, wch],
        &[],
    );
    let min = essential(&mut lib, "min", "|- ph");
    let maj = essential(&mut lib, "maj", "|- ( ph -> ps )");
    axiom(&mut lib, "ax-mp", "|- ps", &[wph, wps], &[min, maj]);

    let x = lib.symbol("x").unwrap();
    let y = lib.symbol("y").unwrap();
    let z = lib.symbol("z").unwrap();
    let axdv = lib.add_statement("ax-dv", "|- dv x y", SentenceType::Axiom).unwrap();
    lib.add_assertion(axdv, Assertion::axiom(axdv, vec![vx, vy], vec![], [(x, y)]))
        .unwrap();

    let id_proof = UncompressedProof::new(labels(&lib, ID_PROOF));
    theorem(&mut lib, "id", "|- ( ph -> ph )", |l| {
        Assertion::theorem(l, vec![wph], vec![], [], Some(id_proof.into()))
    });
    let id_c = CompressedProof::new(labels(&lib, &ID_REFS.join(" ")), ID_CODES.to_vec());
    theorem(&mut lib, "id-c", "|- ( ph -> ph )", |l| {
        Assertion::theorem(l, vec![wph], vec![], [], Some(id_c.into()))
    });

    let h1 = essential(&mut lib, "mp-inst.1", "|- ph");
    let h2 = essential(&mut lib, "mp-inst.2", "|- ( ph -> ps )");
    let mp_proof = UncompressedProof::new(labels(&lib, "wph wps mp-inst.1 mp-inst.2 ax-mp"));
    theorem(&mut lib, "mp-inst", "|- ps", |l| {
        Assertion::theorem(l, vec![wph, wps], vec![h1, h2], [], Some(mp_proof.into()))
    });

    let dv_proof = UncompressedProof::new(labels(&lib, "vz vx ax-dv"));
    let dv_wide_proof = dv_proof.clone();
    theorem(&mut lib, "dv-ok", "|- dv z x", |l| {
        Assertion::theorem(l, vec![vx, vz], vec![], [(x, z)], Some(dv_proof.into()))
    });
    theorem(&mut lib, "dv-wide", "|- dv z x", |l| {
        Assertion::theorem(l, vec![vx, vz], vec![], [], Some(dv_wide_proof.into()))
    });
    let dv_bad_proof = UncompressedProof::new(labels(&lib, "vx vx ax-dv"));
    theorem(&mut lib, "dv-bad", "|- dv x x", |l| {
        Assertion::theorem(l, vec![vx], vec![], [], Some(dv_bad_proof.into()))
    });

    let wnest_proof = UncompressedProof::new(labels(&lib, "wph wph wi wph wph wi wi"));
    theorem(&mut lib, "wnest", "wff ( ( ph -> ph ) -> ( ph -> ph ) )", |l| {
        Assertion::theorem(l, vec![wph], vec![], [], Some(wnest_proof.into()))
    });
    lib
}
