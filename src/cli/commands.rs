// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `fetch`, `ask`, `chat` and
// `download`, and their flags.
//
// Settings shared by every command (model directory, fetch
// timeout, spelling correction) can also come from the
// environment, so a deployment can set them once.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::config::AppConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a product page and print its card
    Fetch(FetchArgs),

    /// Ask one question about a product
    Ask(AskArgs),

    /// Fetch a product once, then answer questions read from stdin
    Chat(ChatArgs),

    /// Download the QA model, tokenizer and spelling dictionary
    Download(DownloadArgs),
}

/// Flags every command accepts.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory holding the model checkpoint, tokenizer and dictionary
    #[arg(long, env = "PRODUCT_QA_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Timeout in seconds for fetching the product page
    #[arg(long, env = "PRODUCT_QA_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Ask the model the question exactly as typed (minus punctuation)
    #[arg(long, env = "PRODUCT_QA_NO_SPELLCHECK")]
    pub no_spellcheck: bool,
}

/// Convert CLI flags into the application-layer config.
impl From<&CommonArgs> for AppConfig {
    fn from(a: &CommonArgs) -> Self {
        AppConfig {
            model_dir:  a.model_dir.clone(),
            timeout:    Duration::from_secs(a.timeout_secs),
            spellcheck: !a.no_spellcheck,
        }
    }
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Product page URL
    #[arg(long)]
    pub url: String,

    /// Print the extracted record as JSON instead of the card
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Product page URL
    #[arg(long)]
    pub url: String,

    /// The question, e.g. "what is the battery capacity?"
    #[arg(long)]
    pub question: String,

    /// Also print the normalised question and both raw spans
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Product page URL
    #[arg(long)]
    pub url: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Load the downloaded checkpoint once to check it is usable
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}
