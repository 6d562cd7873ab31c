use serde::{Deserialize, Serialize};

use super::product::{PriceValue, ProductPrice};

/// Competitor prices document, keyed by EAN in the price store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub prices: Vec<StoredPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrice {
    #[serde(default)]
    pub store: String,
    #[serde(default)]
    pub store_image: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub currency: String,
}

impl From<StoredPrice> for ProductPrice {
    fn from(stored: StoredPrice) -> Self {
        ProductPrice {
            store: stored.store,
            store_image: stored.store_image,
            url: stored.url,
            price: PriceValue::Amount(stored.price),
            currency: stored.currency,
        }
    }
}

impl PriceRecord {
    pub fn into_prices(self) -> Vec<ProductPrice> {
        self.prices.into_iter().map(ProductPrice::from).collect()
    }
}
