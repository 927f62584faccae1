// ============================================================
// Layer 2 — Application Config
// ============================================================
// Plain settings handed down from the CLI. The application
// layer never sees clap types; cli::commands converts its
// argument structs into this.

use std::path::PathBuf;
use std::time::Duration;

use crate::infra::model_store::SPELLING_FILE;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the checkpoint, tokenizer and dictionary
    pub model_dir: PathBuf,

    /// Request timeout for product page fetches
    pub timeout: Duration,

    /// Correct question spelling before asking the model
    pub spellcheck: bool,
}

impl AppConfig {
    pub fn spelling_path(&self) -> PathBuf {
        self.model_dir.join(SPELLING_FILE)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir:  PathBuf::from("models"),
            timeout:    Duration::from_secs(30),
            spellcheck: true,
        }
    }
}
