// ============================================================
// Layer 3 — Answer Spans and the Dual-Span Merge
// ============================================================
// The model answers by pointing at a span of the encoded input:
// a start position and an end position, chosen independently.
//
// Example:
//   Question: "what is the colour ?"
//   Context:  "Colour is Black. Weight is 200 g."
//   Span:     positions 9..=9 → "black"
//
// The two positions are NOT constrained against each other, so
// end < start happens. Such a span contains no tokens and
// decodes to the empty string.
//
// Each question is answered twice, once per context block, and
// the two spans are merged into one line:
//
//   merge("a b a", "c b d") → "a b , c d"

use serde::{Deserialize, Serialize};

/// One span chosen by the model, already decoded to text.
///
/// `start` and `end` index the combined
/// [CLS] question [SEP] context [SEP] token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpan {
    pub start: usize,

    /// Inclusive: the span is [start..=end]
    pub end: usize,

    pub text: String,
}

impl AnswerSpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self { start, end, text: text.into() }
    }

    /// Number of tokens covered; zero for an inverted span
    pub fn span_length(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Separator placed between the words of the two spans.
const SEPARATOR: &str = ",";

/// Merge two answer strings into one deduplicated line.
///
/// Words of `first` come first, then the words of `second` not
/// already present, with a "," between the two groups. The comma
/// only survives when both groups contributed words.
pub fn merge_answers(first: &str, second: &str) -> String {
    let mut words: Vec<&str> = Vec::new();

    for word in first.split(' ') {
        if !words.contains(&word) {
            words.push(word);
        }
    }

    words.push(SEPARATOR);

    for word in second.split(' ') {
        if !words.contains(&word) {
            words.push(word);
        }
    }

    // The empty word of an empty span sits next to the separator,
    // so whitespace is trimmed again once the comma is gone.
    words
        .join(" ")
        .trim()
        .trim_matches(',')
        .trim()
        .to_string()
}
