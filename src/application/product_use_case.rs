// ============================================================
// Layer 2 — Product Use Case
// ============================================================
// Fetches a product page once and turns it into a record plus
// the figures shown on the product card. The record's two
// context blocks are what AskUseCase later answers from.

use anyhow::Result;

use crate::application::config::AppConfig;
use crate::data::extractor::ProductExtractor;
use crate::data::fetcher::{AmazonProductSource, PageFetcher};
use crate::domain::product::ProductRecord;
use crate::domain::summary::ProductSummary;
use crate::domain::traits::ProductSource;

pub struct ProductUseCase {
    source: Box<dyn ProductSource>,
}

impl ProductUseCase {
    pub fn new(source: Box<dyn ProductSource>) -> Self {
        Self { source }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(config.timeout)?;
        let source = AmazonProductSource::new(fetcher, ProductExtractor::new()?);
        Ok(Self::new(Box::new(source)))
    }

    /// Fetch and extract the product behind `url`.
    pub fn fetch(&self, url: &str) -> Result<ProductRecord> {
        tracing::info!("Fetching product page {}", url);
        let record = self.source.fetch_product(url)?;

        if !record.has_context() {
            tracing::warn!(
                "No features or specifications found on '{}'; answers will be empty",
                url
            );
        }
        tracing::info!(
            "Extracted {} features, {} specs, {} images",
            record.features.len(),
            record.specs.len(),
            record.images.len()
        );
        Ok(record)
    }

    pub fn summary(&self, record: &ProductRecord) -> ProductSummary {
        ProductSummary::from_record(record)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductFields;

    struct StubSource(ProductFields);

    impl ProductSource for StubSource {
        fn fetch_product(&self, url: &str) -> Result<ProductRecord> {
            Ok(ProductRecord::new(url, self.0.clone()))
        }
    }

    struct OfflineSource;

    impl ProductSource for OfflineSource {
        fn fetch_product(&self, url: &str) -> Result<ProductRecord> {
            anyhow::bail!("Cannot fetch '{url}'")
        }
    }

    fn fields() -> ProductFields {
        ProductFields {
            name: Some("Phone X (Blue, 128GB)".into()),
            discount_price: Some("₹9,999.00".into()),
            actual_price: Some("₹12,999.00".into()),
            rating: Some(4.2),
            histogram: vec![60.0, 20.0, 8.0, 4.0, 8.0],
            features: vec!["a".into(), "Dual camera".into(), "z".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_fetch_builds_record_with_contexts() {
        let uc = ProductUseCase::new(Box::new(StubSource(fields())));
        let record = uc.fetch("https://example.com/dp/1").unwrap();
        assert_eq!(record.url, "https://example.com/dp/1");
        assert_eq!(record.context1, "Product has Dual camera. ");
        assert!(record.context2.is_empty());
    }

    #[test]
    fn test_empty_page_is_not_an_error() {
        let uc = ProductUseCase::new(Box::new(StubSource(ProductFields::default())));
        let record = uc.fetch("https://example.com/dp/2").unwrap();
        assert!(!record.has_context());
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let uc = ProductUseCase::new(Box::new(OfflineSource));
        assert!(uc.fetch("https://example.com/dp/3").is_err());
    }

    #[test]
    fn test_summary() {
        let uc = ProductUseCase::new(Box::new(StubSource(fields())));
        let record = uc.fetch("https://example.com/dp/1").unwrap();
        let summary = uc.summary(&record);
        assert_eq!(summary.title, "Phone X");
        assert_eq!(summary.positive_share, Some(88.0));
        assert_eq!(summary.stars, Some(4));
    }

    #[test]
    fn test_from_config_builds_real_source() {
        assert!(ProductUseCase::from_config(&AppConfig::default()).is_ok());
    }
}
