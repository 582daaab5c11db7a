//! Textual proof layouts.
//!
//! An uncompressed proof is a whitespace separated list of label names. A
//! compressed proof is `( refs ) LETTERS`, where the letters may be broken up
//! by whitespace anywhere. A proof consisting of `?` is incomplete.

use crate::codec::{CompressedDecoder, encode_codes};
use crate::error::{FormatError, FormatResult};
use mmkit_core::{CompressedProof, LabTok, Library, Proof, UncompressedProof};

/// Width at which [`format_proof`] wraps lines.
pub const LINE_WIDTH: usize = 79;

/// Parse proof text, resolving label names through `lib`.
pub fn parse_proof<L: Library + ?Sized>(lib: &L, text: &str) -> FormatResult<Proof> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('(') {
        let Some((refs_text, letters)) = rest.split_once(')') else {
            return Err(FormatError::UnterminatedRefs);
        };
        let refs = resolve_labels(lib, refs_text)?;
        let mut decoder = CompressedDecoder::new();
        let mut codes = Vec::new();
        for c in letters.chars() {
            if c == '?' {
                return Err(FormatError::Incomplete);
            }
            if let Some(code) = decoder.push_char(c)? {
                codes.push(code);
            }
        }
        decoder.finish()?;
        return Ok(CompressedProof::new(refs, codes).into());
    }
    Ok(UncompressedProof::new(resolve_labels(lib, text)?).into())
}

fn resolve_labels<L: Library + ?Sized>(lib: &L, text: &str) -> FormatResult<Vec<LabTok>> {
    text.split_whitespace()
        .map(|name| match name {
            "?" => Err(FormatError::Incomplete),
            _ => lib
                .label(name)
                .ok_or_else(|| FormatError::UnknownLabel(name.to_string())),
        })
        .collect()
}

/// Render a proof in its textual layout, wrapped at [`LINE_WIDTH`].
#[must_use]
pub fn format_proof<L: Library + ?Sized>(lib: &L, proof: &Proof) -> String {
    let mut out = LineWriter::default();
    match proof {
        Proof::Uncompressed(proof) => {
            for &label in proof.labels() {
                out.push_word(lib.resolve_label(label));
            }
        }
        Proof::Compressed(proof) => {
            out.push_word("(");
            for &label in proof.refs() {
                out.push_word(lib.resolve_label(label));
            }
            out.push_word(")");
            out.push_letters(&encode_codes(proof.codes()));
        }
    }
    out.finish()
}

#[derive(Default)]
struct LineWriter {
    text: String,
    column: usize,
}

impl LineWriter {
    fn push_word(&mut self, word: &str) {
        if self.column > 0 && self.column + 1 + word.len() > LINE_WIDTH {
            self.text.push('\n');
            self.column = 0;
        }
        if self.column > 0 {
            self.text.push(' ');
            self.column += 1;
        }
        self.text.push_str(word);
        self.column += word.len();
    }

    fn push_letters(&mut self, letters: &str) {
        if letters.is_empty() {
            return;
        }
        if self.column + 1 >= LINE_WIDTH {
            self.text.push('\n');
            self.column = 0;
        } else if self.column > 0 {
            self.text.push(' ');
            self.column += 1;
        }
        // Letters are ASCII, so byte offsets are char boundaries.
        let mut rest = letters;
        while !rest.is_empty() {
            let room = LINE_WIDTH.saturating_sub(self.column);
            if room == 0 {
                self.text.push('\n');
                self.column = 0;
                continue;
            }
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            self.text.push_str(chunk);
            self.column += chunk.len();
            rest = tail;
        }
    }

    fn finish(self) -> String {
        self.text
    }
}
