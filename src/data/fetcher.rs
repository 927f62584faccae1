// ============================================================
// Layer 4 — Page Fetcher
// ============================================================
// Downloads product page markup over HTTP(S).
//
// The retailer serves a stripped-down page (or a robot check)
// to clients that do not look like a desktop browser, so every
// request carries browser-like headers. gzip/deflate bodies are
// decoded by reqwest.
//
// No retry, no caching, no rate limiting: one GET per call.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;

use crate::data::extractor::ProductExtractor;
use crate::domain::product::ProductRecord;
use crate::domain::traits::ProductSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/78.0.3904.108 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()
            .context("Cannot build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    ///
    /// A non-success status is only logged: the body is still
    /// returned so extraction can take whatever is there.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Cannot fetch '{url}'"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("'{}' answered {}; fields may be missing", url, status);
        }

        let body = response
            .text()
            .with_context(|| format!("Cannot read body of '{url}'"))?;
        tracing::debug!("Fetched {} bytes from '{}'", body.len(), url);
        Ok(body)
    }
}

/// Product source for the supported retailer: fetch, then extract.
pub struct AmazonProductSource {
    fetcher:   PageFetcher,
    extractor: ProductExtractor,
}

impl AmazonProductSource {
    pub fn new(fetcher: PageFetcher, extractor: ProductExtractor) -> Self {
        Self { fetcher, extractor }
    }
}

impl ProductSource for AmazonProductSource {
    fn fetch_product(&self, url: &str) -> Result<ProductRecord> {
        let html = self.fetcher.fetch(url)?;
        Ok(self.extractor.extract(url, &html))
    }
}
