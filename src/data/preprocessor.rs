// ============================================================
// Layer 4 — Markup Text Preprocessor
// ============================================================
// The text of a markup element comes out as one long string in
// which the page's own layout is still visible:
//
//   "\n\n   Bluetooth 5.0  \n   20 hour battery   \n"
//
// Bullet lists and spec tables are broken back into fragments
// by splitting on newlines and on runs of two spaces (the
// indentation the page uses between cells). Spec tables also
// carry U+200E (left-to-right mark) between name and value, so
// that mark is a separator there too.
//
// Fragments are trimmed and blank ones dropped.

use regex::Regex;

pub struct Preprocessor {
    /// newline or double space
    fragment_sep: Regex,
    /// newline, left-to-right mark or double space
    spec_sep: Regex,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            fragment_sep: Regex::new(r"\n|  ").expect("static pattern"),
            spec_sep:     Regex::new("\n|\u{200E}|  ").expect("static pattern"),
        }
    }

    /// Split bullet-list or details text into trimmed fragments.
    pub fn fragments(&self, text: &str) -> Vec<String> {
        split_trimmed(&self.fragment_sep, text)
    }

    /// Split spec table text into alternating name/value fragments.
    pub fn spec_fragments(&self, text: &str) -> Vec<String> {
        split_trimmed(&self.spec_sep, text)
    }
}

fn split_trimmed(sep: &Regex, text: &str) -> Vec<String> {
    sep.split(text)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
