// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All burn framework code lives here and in infra::model_store
// (which loads checkpoints into these modules).
//
//   model.rs      — DistilBERT encoder with a span prediction
//                   head, laid out to match the pretrained
//                   checkpoint's parameter names
//
//   inferencer.rs — encodes a (question, context) pair, runs the
//                   model, picks the span and decodes it
//
// No training happens anywhere: weights always come from the
// pretrained checkpoint.

/// DistilBERT question-answering architecture
pub mod model;

/// Inference: encode, forward, pick span, decode
pub mod inferencer;

/// CPU backend used for inference
pub type InferBackend = burn::backend::NdArray;
