// ============================================================
// Layer 3 — ProductRecord Domain Type
// ============================================================
// The structured result of extracting one product page.
//
// Every markup lookup can miss, so every looked-up field is
// either an Option or a (possibly empty) Vec. The two context
// blocks are derived once, at construction, and the record is
// never mutated afterwards:
//
//   context1 — one "Product has ..." sentence per feature bullet
//   context2 — one "<name> is <value>." sentence per spec pair
//
// These two blocks are the passages the QA model reads.

use serde::{Deserialize, Serialize};

/// Raw field values as found in the markup, before derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name:           Option<String>,
    pub discount_price: Option<String>,
    pub actual_price:   Option<String>,
    pub rating:         Option<f32>,
    pub histogram:      Vec<f32>,
    pub images:         Vec<String>,
    pub features:       Vec<String>,
    pub specs:          Vec<String>,
    pub details:        Vec<String>,
}

/// One extracted product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// The page this record was extracted from
    pub url: String,

    pub name: Option<String>,

    /// Offer price, currency text formatted as "<integer part>.00"
    pub discount_price: Option<String>,

    /// List (MRP) price, same formatting as `discount_price`
    pub actual_price: Option<String>,

    /// Average rating, 0 to 5
    pub rating: Option<f32>,

    /// Percentage of reviews per star bucket, 5 stars first
    pub histogram: Vec<f32>,

    /// Product image URLs, in the order the page lists them
    pub images: Vec<String>,

    pub features: Vec<String>,

    /// Alternating spec name, spec value
    pub specs: Vec<String>,

    pub details: Vec<String>,

    pub context1: String,
    pub context2: String,
}

impl ProductRecord {
    /// Build a record and derive both context blocks.
    pub fn new(url: impl Into<String>, fields: ProductFields) -> Self {
        let context1 = feature_context(&fields.features);
        let context2 = spec_context(&fields.specs);
        Self {
            url:            url.into(),
            name:           fields.name,
            discount_price: fields.discount_price,
            actual_price:   fields.actual_price,
            rating:         fields.rating,
            histogram:      fields.histogram,
            images:         fields.images,
            features:       fields.features,
            specs:          fields.specs,
            details:        fields.details,
            context1,
            context2,
        }
    }

    /// (name, value) pairs of the specification list.
    /// A trailing name without a value is not yielded.
    pub fn spec_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.specs
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// True when at least one context block has text to search
    pub fn has_context(&self) -> bool {
        !self.context1.is_empty() || !self.context2.is_empty()
    }
}

/// Sentence sequence built from feature bullets.
///
/// The first and the last bullet are skipped: on the supported
/// page layout they are the "About this item" header and the
/// "See more product details" link.
pub fn feature_context(features: &[String]) -> String {
    if features.len() < 3 {
        return String::new();
    }
    features[1..features.len() - 1]
        .iter()
        .map(|f| format!("Product has {}. ", f.replace(" | ", ", ")))
        .collect()
}

/// "<name> is <value>. " for every spec pair.
pub fn spec_context(specs: &[String]) -> String {
    specs
        .chunks_exact(2)
        .map(|pair| format!("{} is {}. ", pair[0], pair[1]))
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_feature_context_skips_first_and_last() {
        let features = strings(&[
            "About this item",
            "Bluetooth 5.0 | 20 hour battery",
            "Water resistant",
            "See more product details",
        ]);
        assert_eq!(
            feature_context(&features),
            "Product has Bluetooth 5.0, 20 hour battery. Product has Water resistant. "
        );
    }

    #[test]
    fn test_feature_context_too_short_is_empty() {
        assert_eq!(feature_context(&[]), "");
        assert_eq!(feature_context(&strings(&["a", "b"])), "");
    }

    #[test]
    fn test_spec_context_pairs() {
        let specs = strings(&["Colour", "Black", "Weight", "200 g"]);
        assert_eq!(spec_context(&specs), "Colour is Black. Weight is 200 g. ");
    }

    #[test]
    fn test_spec_context_drops_unpaired_name() {
        let specs = strings(&["Colour", "Black", "Brand"]);
        assert_eq!(spec_context(&specs), "Colour is Black. ");
    }

    #[test]
    fn test_new_derives_contexts() {
        let fields = ProductFields {
            name:     Some("Speaker".into()),
            features: strings(&["head", "Loud", "tail"]),
            specs:    strings(&["Colour", "Red"]),
            ..Default::default()
        };
        let record = ProductRecord::new("https://example.com/p", fields);
        assert_eq!(record.context1, "Product has Loud. ");
        assert_eq!(record.context2, "Colour is Red. ");
        assert!(record.has_context());
        assert_eq!(record.spec_pairs().collect::<Vec<_>>(), vec![("Colour", "Red")]);
    }

    #[test]
    fn test_empty_record_has_no_context() {
        let record = ProductRecord::new("u", ProductFields::default());
        assert!(!record.has_context());
        assert!(record.name.is_none());
    }
}
