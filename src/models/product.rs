use serde::{Deserialize, Serialize};

/// Canonical product assembled from a catalog item and, for single lookups,
/// the competitor prices held in the price store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub asin: String,
    pub ean: String,
    pub upc: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub images: Vec<String>,
    pub prices: Vec<ProductPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub store: String,
    pub store_image: String,
    pub url: String,
    pub price: PriceValue,
    pub currency: String,
}

/// A price is numeric while it is being merged and sorted, and a display
/// string once formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Amount(f64),
    Formatted(String),
}

impl PriceValue {
    pub fn amount(&self) -> Option<f64> {
        match self {
            PriceValue::Amount(amount) => Some(*amount),
            PriceValue::Formatted(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}
