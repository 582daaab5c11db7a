//! Small propositional library shared by the unit tests.

use mmkit_core::{Assertion, Library, LibraryImpl, SentenceType, UncompressedProof};

pub(crate) const ID_PROOF: &str = "wph wph wph wi wi wph wph wi wph wph ax-1 wph wph wph wi wph wi wi \
     wph wph wph wi wi wph wph wi wi wph wph wph wi ax-1 wph wph wph wi wph ax-2 ax-mp ax-mp";

fn proof_of(lib: &LibraryImpl, text: &str) -> UncompressedProof {
    UncompressedProof::new(
        text.split_whitespace()
            .map(|name| lib.label(name).unwrap())
            .collect(),
    )
}

/// `wi`, `ax-1`, `ax-2`, `ax-mp`, the theorem `id`, and a distinct variable
/// axiom `ax-dv` over a separate `set` sort.
pub(crate) fn library() -> LibraryImpl {
    let mut lib = LibraryImpl::new();
    for c in ["(", ")", "->", "wff", "|-", "set", "dv"] {
        lib.create_symbol(c, true).unwrap();
    }
    for v in ["ph", "ps", "ch", "x", "y", "z"] {
        lib.create_symbol(v, false).unwrap();
    }
    let f = SentenceType::FloatingHyp;
    let wph = lib.add_statement("wph", "wff ph", f).unwrap();
    let wps = lib.add_statement("wps", "wff ps", f).unwrap();
    let wch = lib.add_statement("wch", "wff ch", f).unwrap();
    let vx = lib.add_statement("vx", "set x", f).unwrap();
    let vy = lib.add_statement("vy", "set y", f).unwrap();
    lib.add_statement("vz", "set z", f).unwrap();

    let a = SentenceType::Axiom;
    let wi = lib.add_statement("wi", "wff ( ph -> ps )", a).unwrap();
    lib.add_assertion(wi, Assertion::axiom(wi, vec![wph, wps], vec![], []))
        .unwrap();
    let ax1 = lib
        .add_statement("ax-1", "|- ( ph -> ( ps -> ph ) )", a)
        .unwrap();
    lib.add_assertion(ax1, Assertion::axiom(ax1, vec![wph, wps], vec![], []))
        .unwrap();
    let ax2 = lib
        .add_statement(
            "ax-2",
            "|- ( ( ph -> ( ps -> ch ) ) -> ( ( ph -> ps ) -> ( ph -> ch ) ) )",
            a,
        )
        .unwrap();
    lib.add_assertion(ax2, Assertion::axiom(ax2, vec![wph, wps, wch], vec![], []))
        .unwrap();
    let e = SentenceType::EssentialHyp;
    let min = lib.add_statement("min", "|- ph", e).unwrap();
    let maj = lib.add_statement("maj", "|- ( ph -> ps )", e).unwrap();
    let mp = lib.add_statement("ax-mp", "|- ps", a).unwrap();
    lib.add_assertion(mp, Assertion::axiom(mp, vec![wph, wps], vec![min, maj], []))
        .unwrap();

    let x = lib.symbol("x").unwrap();
    let y = lib.symbol("y").unwrap();
    let axdv = lib.add_statement("ax-dv", "|- dv x y", a).unwrap();
    lib.add_assertion(axdv, Assertion::axiom(axdv, vec![vx, vy], vec![], [(x, y)]))
        .unwrap();

    let id = lib
        .add_statement("id", "|- ( ph -> ph )", SentenceType::Proposition)
        .unwrap();
    let proof = proof_of(&lib, ID_PROOF);
    lib.add_assertion(id, Assertion::theorem(id, vec![wph], vec![], [], Some(proof.into())))
        .unwrap();
    lib
}
