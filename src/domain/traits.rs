// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// network fetch, the neural model and the spelling dictionary
// can all be replaced by stubs in tests.

use anyhow::Result;
use std::path::Path;

use crate::domain::answer::AnswerSpan;
use crate::domain::product::ProductRecord;

// ─── ProductSource ────────────────────────────────────────────────────────────
/// Anything that can turn a product page URL into a record.
///
/// Implementations:
///   - AmazonProductSource → HTTP fetch + markup extraction
pub trait ProductSource {
    /// Fetch the page behind `url` and extract its fields.
    /// Lookups that find nothing leave the field empty; only
    /// transport failures are errors.
    fn fetch_product(&self, url: &str) -> Result<ProductRecord>;
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// An extractive QA model: picks a span of `context` answering `question`.
///
/// Must be `Sync` because the two context blocks are queried in parallel.
pub trait QuestionAnswerer: Sync {
    fn answer(&self, question: &str, context: &str) -> Result<AnswerSpan>;

    /// Load whatever `answer` needs, before any parallel calls.
    fn prepare(&self) -> Result<()> {
        Ok(())
    }
}

// ─── SpellChecker ─────────────────────────────────────────────────────────────
/// Corrects one lowercase token. Total: returns the token itself
/// when no better spelling is known.
pub trait SpellChecker {
    fn correct(&self, token: &str) -> String;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - FrequencySpeller → word frequency dictionary
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}
