// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// Answers one question about one product:
//
//   raw question ──normalize──▶ "whats the color ?"
//                                   │
//                ┌──────────────────┴──────────────────┐
//                ▼                                     ▼
//      answer(question, context1)          answer(question, context2)
//         (feature sentences)                 (spec sentences)
//                └──────────────────┬──────────────────┘
//                                   ▼
//                       merge_answers(span1, span2)
//
// The two model calls are independent and run in parallel.

use anyhow::{bail, Result};

use crate::application::config::AppConfig;
use crate::data::speller::{FrequencySpeller, PassThrough};
use crate::domain::answer::{merge_answers, AnswerSpan};
use crate::domain::product::ProductRecord;
use crate::domain::question::{normalize_question, NormalizedQuestion};
use crate::domain::traits::{Persistable, QuestionAnswerer, SpellChecker};
use crate::infra::cache::ModelCache;
use crate::infra::model_store::ModelStore;

/// Everything produced while answering, for logging and display.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerReport {
    pub question: NormalizedQuestion,
    pub first:    AnswerSpan,
    pub second:   AnswerSpan,
    pub answer:   String,
}

pub struct AskUseCase {
    answerer: Box<dyn QuestionAnswerer>,
    speller:  Box<dyn SpellChecker + Send + Sync>,
}

impl AskUseCase {
    pub fn new(
        answerer: Box<dyn QuestionAnswerer>,
        speller:  Box<dyn SpellChecker + Send + Sync>,
    ) -> Self {
        Self { answerer, speller }
    }

    /// Wire up the real model and dictionary from `config`.
    ///
    /// The model itself is loaded lazily on the first question;
    /// the spelling dictionary is loaded here.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let speller: Box<dyn SpellChecker + Send + Sync> = if config.spellcheck {
            Box::new(FrequencySpeller::load(&config.spelling_path())?)
        } else {
            tracing::info!("Spelling correction disabled");
            Box::new(PassThrough)
        };

        let cache = ModelCache::new(ModelStore::new(&config.model_dir));
        Ok(Self::new(Box::new(cache), speller))
    }

    /// Answer `raw_question` against both context blocks and keep
    /// the intermediate spans.
    pub fn explain(&self, context1: &str, context2: &str, raw_question: &str) -> Result<AnswerReport> {
        if raw_question.trim().is_empty() {
            bail!("Question is empty");
        }

        let question = normalize_question(raw_question, self.speller.as_ref());
        tracing::debug!(
            "Normalised question: {:?} ({} tokens)",
            question.as_str(),
            question.tokens().count()
        );

        let answerer = self.answerer.as_ref();
        answerer.prepare()?;
        let (first, second) = rayon::join(
            || answerer.answer(question.as_str(), context1),
            || answerer.answer(question.as_str(), context2),
        );
        let (first, second) = (first?, second?);
        tracing::debug!(
            "Spans: features {} tokens {:?}, specs {} tokens {:?}",
            first.span_length(), first.text,
            second.span_length(), second.text
        );
        if first.is_empty() && second.is_empty() {
            tracing::debug!("Neither context produced an answer span");
        }

        let answer = merge_answers(&first.text, &second.text);
        Ok(AnswerReport { question, first, second, answer })
    }

    /// The merged answer to `raw_question` over the two contexts.
    pub fn get_answer(&self, context1: &str, context2: &str, raw_question: &str) -> Result<String> {
        Ok(self.explain(context1, context2, raw_question)?.answer)
    }

    /// The merged answer to `raw_question` about `product`.
    pub fn ask(&self, product: &ProductRecord, raw_question: &str) -> Result<String> {
        self.get_answer(&product.context1, &product.context2, raw_question)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductFields;
    use std::collections::HashMap;

    /// Answers with the first context word that also appears in the
    /// question, plus the word after it.
    struct OverlapAnswerer;

    impl QuestionAnswerer for OverlapAnswerer {
        fn answer(&self, question: &str, context: &str) -> Result<AnswerSpan> {
            let words: Vec<&str> = context.split_whitespace().collect();
            let hit = words
                .iter()
                .position(|w| question.split_whitespace().any(|q| q == *w));
            Ok(match hit {
                Some(i) => {
                    let end = (i + 1).min(words.len() - 1);
                    AnswerSpan::new(i, end, words[i..=end].join(" "))
                }
                None => AnswerSpan::new(1, 0, ""),
            })
        }
    }

    struct FailingAnswerer;

    impl QuestionAnswerer for FailingAnswerer {
        fn answer(&self, _: &str, _: &str) -> Result<AnswerSpan> {
            bail!("model unavailable")
        }
    }

    struct FixedSpeller(HashMap<&'static str, &'static str>);

    impl SpellChecker for FixedSpeller {
        fn correct(&self, token: &str) -> String {
            self.0.get(token).copied().unwrap_or(token).to_string()
        }
    }

    fn use_case() -> AskUseCase {
        let speller = FixedSpeller(HashMap::from([("colr", "colour")]));
        AskUseCase::new(Box::new(OverlapAnswerer), Box::new(speller))
    }

    #[test]
    fn test_merges_both_contexts() {
        let answer = use_case()
            .get_answer("colour black and", "weight 200 grams", "What colour? Weight?")
            .unwrap();
        assert_eq!(answer, "colour black , weight 200");
    }

    #[test]
    fn test_question_is_normalised_before_asking() {
        let report = use_case()
            .explain("colour black", "nothing here", "Colr!")
            .unwrap();
        assert_eq!(report.question.as_str(), "colour ?");
        assert_eq!(report.first.text, "colour black");
        assert!(report.second.is_empty());
        assert_eq!(report.answer, "colour black");
    }

    #[test]
    fn test_no_match_anywhere_gives_empty_answer() {
        let answer = use_case().get_answer("a b", "c d", "zzz").unwrap();
        assert_eq!(answer, "");
    }

    #[test]
    fn test_empty_question_is_rejected() {
        assert!(use_case().get_answer("a", "b", "   ").is_err());
    }

    #[test]
    fn test_model_failure_propagates() {
        let uc = AskUseCase::new(Box::new(FailingAnswerer), Box::new(PassThrough));
        let err = uc.get_answer("a", "b", "what").unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }

    #[test]
    fn test_ask_uses_product_contexts() {
        let product = ProductRecord::new(
            "https://example.com/dp/1",
            ProductFields {
                features: vec![
                    "Brand".into(),
                    "battery lasts 10 hours".into(),
                    "water proof".into(),
                    "Warranty".into(),
                ],
                specs: vec!["battery".into(), "5000mAh".into()],
                ..Default::default()
            },
        );
        let answer = use_case().ask(&product, "battery?").unwrap();
        assert_eq!(answer, "battery lasts , is");
    }
}
