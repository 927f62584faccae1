// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the other layers:
//
//   model_store.rs     — The model directory: reads config.json,
//                        loads the pretrained PyTorch weights into
//                        the burn model, and downloads missing
//                        files (weights, tokenizer, spelling
//                        dictionary).
//
//   tokenizer_store.rs — Loads the WordPiece tokenizer and sets
//                        its truncation to the model's window.
//
//   cache.rs           — Process-lifetime slots for the model and
//                        tokenizer, filled once on first use.

/// Model directory: config, weights, downloads
pub mod model_store;

/// Tokenizer loading
pub mod tokenizer_store;

/// Initialize-once model and tokenizer singletons
pub mod cache;
