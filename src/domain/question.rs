// ============================================================
// Layer 3 — Question Normaliser
// ============================================================
// Turns raw user input into the query string the QA model sees:
//
//   "Whats teh colr?"
//     1. drop punctuation      → "Whats teh colr"
//     2. lowercase             → "whats teh colr"
//     3. split on whitespace   → ["whats", "teh", "colr"]
//     4. correct each token    → ["whats", "the", "color"]
//     5. join with spaces      → "whats the color"
//     6. append " ?"           → "whats the color ?"

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::domain::traits::SpellChecker;

/// A question ready for the model. Always ends in `" ?"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuestion(String);

impl NormalizedQuestion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The corrected tokens, without the trailing question mark
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace().filter(|t| *t != "?")
    }
}

impl fmt::Display for NormalizedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("static pattern"))
}

/// Normalise `raw` with the given spelling corrector.
pub fn normalize_question<S: SpellChecker + ?Sized>(raw: &str, speller: &S) -> NormalizedQuestion {
    let stripped = punctuation().replace_all(raw, "").to_lowercase();

    let corrected: Vec<String> = stripped
        .split_whitespace()
        .map(|token| speller.correct(token))
        .collect();

    NormalizedQuestion(format!("{} ?", corrected.join(" ")))
}
