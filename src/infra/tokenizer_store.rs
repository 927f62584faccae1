// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the pretrained WordPiece tokenizer (HuggingFace JSON
// format) and configures it for pair encoding:
//
//   [CLS] question [SEP] context [SEP]
//
// The model only has `max_len` position embeddings, so longer
// inputs are truncated. Only the context side is cut; the
// question always survives whole.
//
// Decoding joins tokens with single spaces and glues "##"
// continuations back on. Punctuation keeps its own word
// ("usb , c", not "usb, c") so answers from the two contexts
// deduplicate word by word.

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::decoders::wordpiece::WordPiece;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

/// Marker of a word-continuation piece
const CONTINUATION_PREFIX: &str = "##";

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the tokenizer and cap encodings at `max_len` tokens.
    pub fn load(&self, max_len: usize) -> Result<Tokenizer> {
        let mut tokenizer = Tokenizer::from_file(&self.path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}. Run 'download' first.",
                self.path.display(), e
            ))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_len,
                strategy:   TruncationStrategy::OnlySecond,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Cannot set truncation: {e}"))?
            .with_padding(None)
            .with_decoder(Some(WordPiece::new(CONTINUATION_PREFIX.to_string(), false)));

        tracing::info!("Tokenizer loaded from '{}' (max {} tokens)", self.path.display(), max_len);
        Ok(tokenizer)
    }
}
