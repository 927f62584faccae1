// ============================================================
// Layer 4 — Frequency Dictionary Spelling Corrector
// ============================================================
// Corrects one word at a time using a word → count dictionary.
//
// For a word w the candidates are, in order of preference:
//   1. w itself, if it is a known word
//   2. known words one edit away from w
//   3. known words two edits away from w
//   4. w itself (nothing better found)
// and the most frequent candidate wins.
//
// An "edit" is one deletion, transposition of two adjacent
// letters, replacement or insertion of a letter a-z.
//
// Example (dictionary built from English prose):
//   "teh"   → edits1 contains "the", "ten", "tea" → "the" (most frequent)
//   "colr"  → edits1 contains "color", "cold"     → most frequent wins
//   "2021"  → all digits, returned unchanged
//   "x"     → single letters are returned unchanged
//
// Words longer than MAX_TWO_EDIT_LEN letters only get the one-edit
// search; the two-edit candidate set grows with the square of the
// length.
//
// Dictionary file format, one entry per line:
//   ;;; comment lines are skipped
//   the 80030
//   of 40025
//
// Reference: Peter Norvig, "How to Write a Spelling Corrector"

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::domain::traits::{Persistable, SpellChecker};

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Longest word that still gets the two-edit search
const MAX_TWO_EDIT_LEN: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct FrequencySpeller {
    counts: HashMap<String, u64>,
}

impl FrequencySpeller {
    pub fn from_counts(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }

    /// Build a dictionary by counting the lowercase words of a corpus.
    pub fn from_corpus(text: &str) -> Self {
        let word = Regex::new(r"[a-z]+").expect("static pattern");
        let lower = text.to_lowercase();
        let mut counts: HashMap<String, u64> = HashMap::new();
        for m in word.find_iter(&lower) {
            *counts.entry(m.as_str().to_string()).or_insert(0) += 1;
        }
        Self::from_counts(counts)
    }

    /// Parse the "word count" dictionary format.
    /// A line without a count counts the word once.
    pub fn parse(text: &str) -> Self {
        let mut counts = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let count = parts.next().and_then(|c| c.parse().ok()).unwrap_or(1);
            *counts.entry(word.to_lowercase()).or_insert(0) += count;
        }
        Self::from_counts(counts)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    fn known<I: IntoIterator<Item = String>>(&self, words: I) -> HashSet<String> {
        words.into_iter().filter(|w| self.contains(w)).collect()
    }

    /// Best candidate: highest count, ties to the greatest word.
    fn best(&self, candidates: HashSet<String>) -> Option<String> {
        candidates
            .into_iter()
            .max_by(|a, b| self.count(a).cmp(&self.count(b)).then_with(|| a.cmp(b)))
    }
}

/// Every string one edit away from `word`.
fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out = HashSet::new();

    for i in 0..=n {
        let (left, right) = chars.split_at(i);
        let left: String = left.iter().collect();

        if !right.is_empty() {
            // deletion
            out.insert(format!("{left}{}", right[1..].iter().collect::<String>()));
        }
        if right.len() > 1 {
            // transposition
            out.insert(format!(
                "{left}{}{}{}",
                right[1],
                right[0],
                right[2..].iter().collect::<String>()
            ));
        }
        for c in ALPHABET.chars() {
            if !right.is_empty() {
                // replacement
                out.insert(format!("{left}{c}{}", right[1..].iter().collect::<String>()));
            }
            // insertion
            out.insert(format!("{left}{c}{}", right.iter().collect::<String>()));
        }
    }
    out
}

impl SpellChecker for FrequencySpeller {
    fn correct(&self, token: &str) -> String {
        let is_number = !token.is_empty() && token.chars().all(char::is_numeric);
        if self.contains(token) || is_number || token.chars().count() == 1 {
            return token.to_string();
        }
        let word = token.to_lowercase();
        if self.contains(&word) {
            return word;
        }

        let near = edits1(&word);
        let found = self.known(near.iter().cloned());
        if let Some(best) = self.best(found) {
            return best;
        }

        if word.chars().count() > MAX_TWO_EDIT_LEN {
            tracing::debug!("'{}' too long for a two-edit search", word);
            return word;
        }

        let far = self.known(near.iter().flat_map(|e| edits1(e)));
        self.best(far).unwrap_or(word)
    }
}

impl Persistable for FrequencySpeller {
    /// Write the dictionary, most frequent words first.
    fn save(&self, path: &Path) -> Result<()> {
        let mut entries: Vec<(&String, &u64)> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut out = String::from(";;; word frequency dictionary\n");
        for (word, count) in entries {
            out.push_str(&format!("{word} {count}\n"));
        }
        fs::write(path, out)
            .with_context(|| format!("Cannot write dictionary to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read spelling dictionary '{}'. Run 'download' first \
                 or pass --no-spellcheck.",
                path.display()
            )
        })?;
        let speller = Self::parse(&text);
        if speller.is_empty() {
            tracing::warn!("'{}' has no words; questions will not be corrected", path.display());
        } else {
            tracing::info!("Spelling dictionary loaded: {} words", speller.len());
        }
        Ok(speller)
    }
}

/// Corrector used when spelling correction is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl SpellChecker for PassThrough {
    fn correct(&self, token: &str) -> String {
        token.to_string()
    }
}
