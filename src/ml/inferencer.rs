// ============================================================
// Layer 5 — Inferencer
// ============================================================
// One question against one context block:
//
//   1. encode "[CLS] question [SEP] context [SEP]"
//   2. forward pass → start_logits, end_logits
//   3. start = argmax(start_logits), end = argmax(end_logits),
//      each over EVERY position, independently
//   4. ids[start..=end], decoded without special tokens
//
// The two argmaxes are not tied to each other: end may land
// before start, giving an empty answer, and either may land in
// the question. That is the model's answer and it is returned
// as is.

use anyhow::Result;
use burn::prelude::*;
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::domain::answer::AnswerSpan;
use crate::ml::model::DistilBertQa;

pub struct Inferencer<B: Backend> {
    model:     DistilBertQa<B>,
    tokenizer: Arc<Tokenizer>,
    device:    B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: DistilBertQa<B>, tokenizer: Arc<Tokenizer>, device: B::Device) -> Self {
        Self { model, tokenizer, device }
    }

    pub fn predict(&self, question: &str, context: &str) -> Result<AnswerSpan> {
        let encoding = self.tokenizer.encode((question, context), true)
            .map_err(|e| anyhow::anyhow!("Tokenise: {e}"))?;
        let input_ids = encoding.get_ids();
        let seq_len = input_ids.len();

        // Forward pass
        let input_flat: Vec<i32> = input_ids.iter().map(|&x| x as i32).collect();
        let input_tensor = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();

        let output = self.model.forward(input_tensor);
        let start_logits = logits_to_vec(output.start_logits, seq_len)?;
        let end_logits   = logits_to_vec(output.end_logits, seq_len)?;

        let (start, end) = select_span(&start_logits, &end_logits);
        let text = self.decode_span(input_ids, start, end)?;

        tracing::debug!("Span [{},{}] of {} tokens, answer='{}'", start, end, seq_len, text);

        Ok(AnswerSpan::new(start, end, text))
    }

    /// Text of `ids[start..=end]` without special tokens.
    fn decode_span(&self, ids: &[u32], start: usize, end: usize) -> Result<String> {
        self.tokenizer
            .decode(span_ids(ids, start, end), true)
            .map_err(|e| anyhow::anyhow!("Decode: {e}"))
    }
}

fn logits_to_vec<B: Backend>(logits: Tensor<B, 2>, seq_len: usize) -> Result<Vec<f32>> {
    logits
        .reshape([seq_len])
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("Read logits: {e:?}"))
}

/// Index of the largest score; the first one wins ties.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// Start and end positions, each chosen on its own.
pub fn select_span(start_logits: &[f32], end_logits: &[f32]) -> (usize, usize) {
    (argmax(start_logits), argmax(end_logits))
}

/// The ids inside [start..=end]; empty when end comes before start.
pub fn span_ids(ids: &[u32], start: usize, end: usize) -> &[u32] {
    if end < start || start >= ids.len() {
        return &[];
    }
    &ids[start..=end.min(ids.len() - 1)]
}
