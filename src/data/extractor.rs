// ============================================================
// Layer 4 — Product Page Field Extractor
// ============================================================
// Pulls product fields out of one retailer's product page
// using CSS selectors (scraper crate).
//
// Every field has an ordered list of selectors. The first
// selector that matches anything wins and only its first
// element is read. If none matches, the field stays empty; a
// missing element is never an error.
//
//   field            selectors (in order)
//   ───────────────  ─────────────────────────────────────────
//   name             span#productTitle
//   discount price   span#priceblock_dealprice
//                    span#priceblock_ourprice
//                    span#tp_price_block_total_price_ww
//   actual price     span.priceBlockStrikePriceString
//                    span.a-text-price
//   images           img#landingImage  (data-a-dynamic-image)
//   rating           span.a-icon-alt
//   histogram        table#histogramTable
//   features         div#feature-bullets
//   specs            table#productDetails_techSpec_section_1
//                    div#detailBullets_feature_div
//   details          div#productDetails_db_sections

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use crate::data::preprocessor::Preprocessor;
use crate::domain::product::{ProductFields, ProductRecord};

/// Selector strings for each field, tried in order.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub name:           Vec<String>,
    pub discount_price: Vec<String>,
    pub actual_price:   Vec<String>,
    pub image:          Vec<String>,
    pub rating:         Vec<String>,
    pub histogram:      Vec<String>,
    pub features:       Vec<String>,
    pub specs:          Vec<String>,
    pub details:        Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            name:           owned(&["span#productTitle"]),
            discount_price: owned(&[
                "span#priceblock_dealprice",
                "span#priceblock_ourprice",
                "span#tp_price_block_total_price_ww",
            ]),
            actual_price:   owned(&["span.priceBlockStrikePriceString", "span.a-text-price"]),
            image:          owned(&["img#landingImage"]),
            rating:         owned(&["span.a-icon-alt"]),
            histogram:      owned(&["table#histogramTable"]),
            features:       owned(&["div#feature-bullets"]),
            specs:          owned(&[
                "table#productDetails_techSpec_section_1",
                "div#detailBullets_feature_div",
            ]),
            details:        owned(&["div#productDetails_db_sections"]),
        }
    }
}

/// Attribute of the landing image holding a JSON map of image URL → size
const DYNAMIC_IMAGE_ATTR: &str = "data-a-dynamic-image";

pub struct ProductExtractor {
    name:           Vec<Selector>,
    discount_price: Vec<Selector>,
    actual_price:   Vec<Selector>,
    image:          Vec<Selector>,
    rating:         Vec<Selector>,
    histogram:      Vec<Selector>,
    features:       Vec<Selector>,
    specs:          Vec<Selector>,
    details:        Vec<Selector>,
    prep:           Preprocessor,
}

impl ProductExtractor {
    /// Extractor for the default page layout
    pub fn new() -> Result<Self> {
        Self::with_config(&SelectorConfig::default())
    }

    pub fn with_config(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            name:           compile_selectors(&config.name)?,
            discount_price: compile_selectors(&config.discount_price)?,
            actual_price:   compile_selectors(&config.actual_price)?,
            image:          compile_selectors(&config.image)?,
            rating:         compile_selectors(&config.rating)?,
            histogram:      compile_selectors(&config.histogram)?,
            features:       compile_selectors(&config.features)?,
            specs:          compile_selectors(&config.specs)?,
            details:        compile_selectors(&config.details)?,
            prep:           Preprocessor::new(),
        })
    }

    /// Extract every field of the page at `url` from its markup.
    pub fn extract(&self, url: &str, html: &str) -> ProductRecord {
        let doc = Html::parse_document(html);

        let fields = ProductFields {
            name:           self.first_text(&doc, &self.name).map(|t| t.trim().to_string()),
            discount_price: self.first_text(&doc, &self.discount_price).map(|t| format_price(&t)),
            actual_price:   self.first_text(&doc, &self.actual_price).map(|t| format_price(&t)),
            rating:         self.first_text(&doc, &self.rating).and_then(|t| parse_rating(&t)),
            histogram:      self.first_text(&doc, &self.histogram)
                                .map(|t| parse_histogram(&t))
                                .unwrap_or_default(),
            images:         first_match(&doc, &self.image)
                                .and_then(|el| el.value().attr(DYNAMIC_IMAGE_ATTR))
                                .map(parse_image_urls)
                                .unwrap_or_default(),
            features:       self.first_text(&doc, &self.features)
                                .map(|t| self.prep.fragments(t.trim()))
                                .unwrap_or_default(),
            specs:          self.first_text(&doc, &self.specs)
                                .map(|t| self.prep.spec_fragments(t.trim()))
                                .unwrap_or_default(),
            details:        self.first_text(&doc, &self.details)
                                .map(|t| self.prep.fragments(&t))
                                .unwrap_or_default(),
        };

        tracing::debug!(
            "Extracted '{}': {} features, {} spec fragments, {} images",
            fields.name.as_deref().unwrap_or("<no name>"),
            fields.features.len(),
            fields.specs.len(),
            fields.images.len()
        );

        ProductRecord::new(url, fields)
    }

    fn first_text(&self, doc: &Html, selectors: &[Selector]) -> Option<String> {
        first_match(doc, selectors).map(|el| el.text().collect::<String>())
    }
}

/// First element matched by the first selector that matches anything.
fn first_match<'a>(doc: &'a Html, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| doc.select(sel).next())
}

/// Compile selector strings, failing on the first invalid one.
fn compile_selectors(selector_strings: &[String]) -> Result<Vec<Selector>> {
    selector_strings
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| anyhow::anyhow!("Invalid selector '{}': {}", s, e))
        })
        .collect()
}

/// "₹1,299.50 " → "₹1,299.00"
fn format_price(text: &str) -> String {
    let whole = text.trim().split('.').next().unwrap_or_default();
    format!("{whole}.00")
}

/// "4.3 out of 5 stars" → 4.3
fn parse_rating(text: &str) -> Option<f32> {
    text.split_whitespace()
        .next()
        .and_then(|t| t.parse::<f32>().ok())
        .filter(|r| (0.0..=5.0).contains(r))
}

/// Histogram table text → percentages, 5 stars first.
///
/// The table reads like "5 star62%4 star20%3 star8%...". Each
/// percentage is the run of digits right before a '%'.
fn parse_histogram(text: &str) -> Vec<f32> {
    let flat = text.replace('\n', "");
    let mut pieces: Vec<&str> = flat.split('%').collect();
    // whatever follows the final '%' is not a bucket
    pieces.pop();

    pieces
        .into_iter()
        .filter_map(|piece| {
            let piece = piece.trim_end();
            let number_start = piece.trim_end_matches(|c: char| c.is_ascii_digit()).len();
            piece[number_start..].parse::<f32>().ok()
        })
        .collect()
}

/// `{"https://…/a.jpg":[500,500],"https://…/b.jpg":[300,300]}` → URLs in order.
fn parse_image_urls(attr: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(attr) {
        Ok(map) => map.keys().cloned().collect(),
        Err(e) => {
            tracing::debug!("Unreadable {DYNAMIC_IMAGE_ATTR}: {e}");
            Vec::new()
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <span id="productTitle">
      boAt Rockerz 450 (Luscious Black)
  </span>
  <span id="priceblock_ourprice">₹1,299.00</span>
  <span class="a-price a-text-price"><span>₹3,990.00</span></span>
  <img id="landingImage" data-a-dynamic-image='{"https://img.example/big.jpg":[679,679],"https://img.example/small.jpg":[450,450]}'>
  <span class="a-icon-alt">4.1 out of 5 stars</span>
  <table id="histogramTable">
    <tr><td>5 star</td><td>62%</td></tr>
    <tr><td>4 star</td><td>20%</td></tr>
    <tr><td>3 star</td><td>8%</td></tr>
    <tr><td>2 star</td><td>3%</td></tr>
    <tr><td>1 star</td><td>7%</td></tr>
  </table>
  <div id="feature-bullets">
    <h1>About this item</h1>
    <ul>
      <li>Playback: 15 hours | Bluetooth 5.0</li>
      <li>Padded ear cushions</li>
    </ul>
    <a>See more product details</a>
  </div>
  <table id="productDetails_techSpec_section_1">
    <tr><th>Brand</th><td>&lrm;boAt</td></tr>
    <tr><th>Colour</th><td>&lrm;Luscious Black</td></tr>
  </table>
  <div id="productDetails_db_sections">
    <span>Customer Reviews</span>
    <span>Best Sellers Rank</span>
  </div>
</body></html>
"#;

    #[test]
    fn test_extracts_every_field() {
        let extractor = ProductExtractor::new().unwrap();
        let record = extractor.extract("https://shop.example/dp/1", PAGE);

        assert_eq!(record.url, "https://shop.example/dp/1");
        assert_eq!(record.name.as_deref(), Some("boAt Rockerz 450 (Luscious Black)"));
        assert_eq!(record.discount_price.as_deref(), Some("₹1,299.00"));
        assert_eq!(record.actual_price.as_deref(), Some("₹3,990.00"));
        assert_eq!(record.rating, Some(4.1));
        assert_eq!(record.histogram, vec![62.0, 20.0, 8.0, 3.0, 7.0]);
        assert_eq!(
            record.images,
            vec!["https://img.example/big.jpg", "https://img.example/small.jpg"]
        );
        assert_eq!(
            record.features,
            vec![
                "About this item",
                "Playback: 15 hours | Bluetooth 5.0",
                "Padded ear cushions",
                "See more product details",
            ]
        );
        assert_eq!(record.specs, vec!["Brand", "boAt", "Colour", "Luscious Black"]);
        assert_eq!(record.details, vec!["Customer Reviews", "Best Sellers Rank"]);
    }

    #[test]
    fn test_contexts_are_derived() {
        let extractor = ProductExtractor::new().unwrap();
        let record = extractor.extract("u", PAGE);

        assert_eq!(
            record.context1,
            "Product has Playback: 15 hours, Bluetooth 5.0. Product has Padded ear cushions. "
        );
        assert_eq!(record.context2, "Brand is boAt. Colour is Luscious Black. ");
    }

    #[test]
    fn test_empty_page_gives_empty_record() {
        let extractor = ProductExtractor::new().unwrap();
        let record = extractor.extract("u", "<html><body><p>Robot check</p></body></html>");

        assert!(record.name.is_none());
        assert!(record.discount_price.is_none());
        assert!(record.rating.is_none());
        assert!(record.histogram.is_empty());
        assert!(record.images.is_empty());
        assert!(record.features.is_empty());
        assert!(!record.has_context());
    }

    #[test]
    fn test_selector_fallback_order() {
        let extractor = ProductExtractor::new().unwrap();
        let html = r#"<span id="priceblock_ourprice">₹10.00</span>
                      <span id="priceblock_dealprice">₹8.49</span>"#;
        let record = extractor.extract("u", html);
        // dealprice is listed first, so it wins even though it appears later
        assert_eq!(record.discount_price.as_deref(), Some("₹8.00"));
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let config = SelectorConfig { name: vec!["span[".to_string()], ..Default::default() };
        assert!(ProductExtractor::with_config(&config).is_err());
    }

    #[test]
    fn test_parse_histogram_skips_garbage() {
        assert_eq!(parse_histogram("5 star 9%4 starxx%"), vec![9.0]);
        assert_eq!(parse_histogram("5 star100%4 star0%"), vec![100.0, 0.0]);
        assert!(parse_histogram("no percentages").is_empty());
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("3.9 out of 5 stars"), Some(3.9));
        assert_eq!(parse_rating("Click to see"), None);
        assert_eq!(parse_rating("42 reviews"), None);
    }

    #[test]
    fn test_bad_image_json_gives_no_images() {
        assert!(parse_image_urls("not json").is_empty());
    }
}
