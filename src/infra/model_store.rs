// ============================================================
// Layer 6 — Model Store
// ============================================================
// Owns the model directory and everything in it:
//
//   models/
//     config.json        ← architecture of the checkpoint
//     pytorch_model.bin  ← pretrained DistilBERT QA weights
//     tokenizer.json     ← WordPiece tokenizer (uncased)
//     spelling.txt       ← word frequency dictionary
//
// `download` fills the directory from the public model hub; every
// other method only reads it.
//
// Loading weights:
//   The checkpoint is a PyTorch state dict. burn-import reads it
//   with PyTorchFileRecorder, transposes Linear weights and renames
//   LayerNorm weight/bias to gamma/beta on its own. The remaining
//   differences are names, fixed with regex key remaps:
//
//     ….LayerNorm.…            → ….layer_norm.…
//     ….attention.q_lin.…      → ….attention.query.…
//     ….attention.k_lin.…      → ….attention.key.…
//     ….attention.v_lin.…      → ….attention.value.…
//     ….attention.out_lin.…    → ….attention.output.…

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, Recorder},
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::data::speller::FrequencySpeller;
use crate::domain::traits::Persistable;
use crate::ml::model::{DistilBertQa, DistilBertQaConfig};

pub const CONFIG_FILE:    &str = "config.json";
pub const WEIGHTS_FILE:   &str = "pytorch_model.bin";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const SPELLING_FILE:  &str = "spelling.txt";

const QA_MODEL_URL: &str =
    "https://huggingface.co/distilbert/distilbert-base-uncased-distilled-squad/resolve/main";
const TOKENIZER_URL: &str =
    "https://huggingface.co/distilbert/distilbert-base-uncased/resolve/main/tokenizer.json";
const SPELLING_CORPUS_URL: &str = "https://norvig.com/big.txt";

const KEY_REMAP: &[(&str, &str)] = &[
    (r"\.LayerNorm\.",         ".layer_norm."),
    (r"\.attention\.q_lin\.",   ".attention.query."),
    (r"\.attention\.k_lin\.",   ".attention.key."),
    (r"\.attention\.v_lin\.",   ".attention.value."),
    (r"\.attention\.out_lin\.", ".attention.output."),
];

/// The subset of the checkpoint's config.json this crate needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub vocab_size:              usize,
    pub max_position_embeddings: usize,
    pub dim:                     usize,
    pub n_layers:                usize,
    pub n_heads:                 usize,
    pub hidden_dim:              usize,
}

impl From<&ModelConfig> for DistilBertQaConfig {
    fn from(c: &ModelConfig) -> Self {
        DistilBertQaConfig::new(
            c.vocab_size, c.max_position_embeddings, c.dim,
            c.n_layers, c.n_heads, c.hidden_dim,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Files the QA model needs that are not on disk yet
    pub fn missing_files(&self) -> Vec<&'static str> {
        [CONFIG_FILE, WEIGHTS_FILE, TOKENIZER_FILE]
            .into_iter()
            .filter(|f| !self.path(f).exists())
            .collect()
    }

    /// Read the architecture section of config.json.
    pub fn load_config(&self) -> Result<ModelConfig> {
        let path = self.path(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read model config from '{}'. \
                     Run 'download' first.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed model config '{}'", path.display()))
    }

    /// Build the model from config.json and load the pretrained weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<DistilBertQa<B>> {
        let cfg = self.load_config()?;
        let model = DistilBertQaConfig::from(&cfg).init::<B>(device);

        let path = self.path(WEIGHTS_FILE);
        tracing::info!(
            "Loading {}-layer model weights from '{}'",
            cfg.n_layers,
            path.display()
        );

        let args = KEY_REMAP
            .iter()
            .fold(LoadArgs::new(path.clone()), |args, (pattern, replacement)| {
                args.with_key_remap(pattern, replacement)
            });

        let record = PyTorchFileRecorder::<FullPrecisionSettings>::default()
            .load(args, device)
            .with_context(|| {
                format!("Cannot load weights '{}'. Run 'download' first.", path.display())
            })?;

        Ok(model.load_record(record))
    }

    /// Fetch every missing file. Files already present are kept.
    pub fn download(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // Checkpoints are hundreds of megabytes: no overall timeout.
        let client = Client::builder()
            .timeout(None)
            .build()
            .context("Cannot build HTTP client")?;

        let downloads = [
            (CONFIG_FILE,    format!("{QA_MODEL_URL}/{CONFIG_FILE}")),
            (WEIGHTS_FILE,   format!("{QA_MODEL_URL}/{WEIGHTS_FILE}")),
            (TOKENIZER_FILE, TOKENIZER_URL.to_string()),
        ];
        for (file, url) in &downloads {
            let path = self.path(file);
            if path.exists() {
                tracing::info!("'{}' already present", path.display());
                continue;
            }
            download_file(&client, url, &path)?;
        }

        let spelling = self.path(SPELLING_FILE);
        if spelling.exists() {
            tracing::info!("'{}' already present", spelling.display());
        } else {
            tracing::info!("Building spelling dictionary from {}", SPELLING_CORPUS_URL);
            let corpus = client
                .get(SPELLING_CORPUS_URL)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .with_context(|| format!("Cannot fetch '{SPELLING_CORPUS_URL}'"))?;
            let speller = FrequencySpeller::from_corpus(&corpus);
            speller.save(&spelling)?;
            tracing::info!("Spelling dictionary: {} words", speller.len());
        }
        Ok(())
    }
}

/// Stream `url` into `path` through a temporary ".part" file.
fn download_file(client: &Client, url: &str, path: &Path) -> Result<()> {
    tracing::info!("Downloading {}", url);

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Cannot fetch '{url}'"))?;

    let partial = path.with_extension("part");
    let mut file = File::create(&partial)
        .with_context(|| format!("Cannot create '{}'", partial.display()))?;
    let bytes = response
        .copy_to(&mut file)
        .with_context(|| format!("Download of '{url}' interrupted"))?;
    fs::rename(&partial, path)
        .with_context(|| format!("Cannot move download to '{}'", path.display()))?;

    tracing::info!("Saved {} ({} bytes)", path.display(), bytes);
    Ok(())
}
