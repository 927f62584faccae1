// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a product URL and the text the model reads,
// plus the word list used to clean up questions.
//
//   product URL
//       │
//       ▼
//   PageFetcher       → GET with browser headers, returns markup
//       │
//       ▼
//   ProductExtractor  → CSS selector lookups, one per field
//       │
//       ▼
//   Preprocessor      → splits element text into fragments
//       │
//       ▼
//   ProductRecord     → fields + context1 / context2
//
//   FrequencySpeller  → corrects question tokens against a
//                       word frequency dictionary

/// HTTP page fetch and the ProductSource implementation
pub mod fetcher;

/// Markup → ProductRecord
pub mod extractor;

/// Splits element text into trimmed fragments
pub mod preprocessor;

/// Frequency-dictionary spelling correction
pub mod speller;
