// ============================================================
// Layer 6 — Process-Lifetime Model Cache
// ============================================================
// The QA model and its tokenizer are expensive to load (hundreds
// of megabytes of weights) and never change once loaded, so each
// lives in a LazySlot:
//
//   - empty until the first question needs it
//   - filled exactly once, even if two questions arrive together:
//     the slot's mutex is held while loading, so the second caller
//     waits and then reuses the first caller's value
//   - a failed load leaves the slot empty; the next call retries
//
// Callers get a clone. Model clones share their tensor storage,
// so each parallel QA call can own a handle without copying
// weights.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;

use crate::domain::answer::AnswerSpan;
use crate::domain::traits::QuestionAnswerer;
use crate::infra::model_store::{ModelStore, TOKENIZER_FILE};
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::inferencer::Inferencer;
use crate::ml::model::DistilBertQa;
use crate::ml::InferBackend;

type Device = <InferBackend as burn::tensor::backend::Backend>::Device;

/// A value built on first use and kept for the life of its owner.
pub struct LazySlot<T> {
    value: Mutex<Option<T>>,
}

impl<T: Clone> LazySlot<T> {
    pub fn new() -> Self {
        Self { value: Mutex::new(None) }
    }

    /// Return the cached value, building it with `init` if empty.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("Model cache lock poisoned"))?;

        if let Some(value) = guard.as_ref() {
            return Ok(value.clone());
        }

        let value = init()?;
        *guard = Some(value.clone());
        Ok(value)
    }

    pub fn is_initialized(&self) -> bool {
        self.value.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl<T: Clone> Default for LazySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The two process-wide model singletons and where to load them from.
pub struct ModelCache {
    store:     ModelStore,
    device:    Device,
    model:     LazySlot<DistilBertQa<InferBackend>>,
    tokenizer: LazySlot<Arc<Tokenizer>>,
}

impl ModelCache {
    pub fn new(store: ModelStore) -> Self {
        Self {
            store,
            device:    Device::default(),
            model:     LazySlot::new(),
            tokenizer: LazySlot::new(),
        }
    }

    fn model(&self) -> Result<DistilBertQa<InferBackend>> {
        self.model.get_or_try_init(|| {
            let model = self.store.load_model::<InferBackend>(&self.device)?;
            tracing::info!("QA model ready");
            Ok(model)
        })
    }

    fn tokenizer(&self) -> Result<Arc<Tokenizer>> {
        self.tokenizer.get_or_try_init(|| {
            let max_len = self.store.load_config()?.max_position_embeddings;
            let tokenizer = TokenizerStore::new(self.store.path(TOKENIZER_FILE)).load(max_len)?;
            Ok(Arc::new(tokenizer))
        })
    }

    /// An inferencer over the cached model, loading it if needed.
    pub fn inferencer(&self) -> Result<Inferencer<InferBackend>> {
        let tokenizer = self.tokenizer()?;
        let model = self.model()?;
        Ok(Inferencer::new(model, tokenizer, self.device.clone()))
    }

    /// Load both singletons now instead of on the first question.
    pub fn warm_up(&self) -> Result<()> {
        if self.model.is_initialized() && self.tokenizer.is_initialized() {
            tracing::debug!("Model already loaded");
            return Ok(());
        }
        self.inferencer().map(|_| ())
    }
}

impl QuestionAnswerer for ModelCache {
    fn answer(&self, question: &str, context: &str) -> Result<AnswerSpan> {
        self.inferencer()?.predict(question, context)
    }

    fn prepare(&self) -> Result<()> {
        self.warm_up()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initializes_once() {
        let slot: LazySlot<u32> = LazySlot::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = slot
                .get_or_try_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .unwrap();
            assert_eq!(v, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(slot.is_initialized());
    }

    #[test]
    fn test_concurrent_callers_share_one_init() {
        let slot: LazySlot<Arc<String>> = LazySlot::new();
        let calls = AtomicUsize::new(0);

        let (a, b) = rayon::join(
            || {
                slot.get_or_try_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    Ok(Arc::new("model".to_string()))
                })
            },
            || {
                slot.get_or_try_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    Ok(Arc::new("model".to_string()))
                })
            },
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_failed_init_can_retry() {
        let slot: LazySlot<u32> = LazySlot::new();
        assert!(slot.get_or_try_init(|| anyhow::bail!("weights missing")).is_err());
        assert!(!slot.is_initialized());
        assert_eq!(slot.get_or_try_init(|| Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_cache_without_files_reports_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(ModelStore::new(dir.path()));
        let err = cache.answer("what ?", "nothing here").unwrap_err();
        assert!(format!("{err:#}").contains("download"));
    }
}
