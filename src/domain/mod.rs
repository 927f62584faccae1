// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, pure functions and traits that define
// what the assistant works with:
//
//   product.rs  — the structured record extracted from a page,
//                 and the two context blocks derived from it
//   question.rs — question normalisation before it reaches the model
//   answer.rs   — answer spans and the two-span merge
//   summary.rs  — display figures computed from a record
//   traits.rs   — the seams other layers implement
//
// Rules for this layer:
//   - NO burn types
//   - NO network or file I/O
//   - Only plain Rust structs, enums, traits and functions

/// Structured product record and context derivation
pub mod product;

/// Question normaliser
pub mod question;

/// Answer spans and the dual-span merge
pub mod answer;

/// Figures shown on the product card
pub mod summary;

/// Core abstractions (traits) that other layers implement
pub mod traits;
