//! Raw catalog provider response shapes.
//!
//! The provider collapses single-element lists into a bare value, so every
//! repeatable element is read through [`OneOrMany`] and flattened once.
//! Empty entries inside a list (`<Item/>`) arrive as `null` and are skipped.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<Option<T>>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().flatten().collect(),
            OneOrMany::One(item) => vec![item],
        }
    }

    pub fn into_first(self) -> Option<T> {
        self.into_vec().into_iter().next()
    }

    pub fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemSearchEnvelope {
    #[serde(rename = "ItemSearchResponse")]
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
pub struct ItemLookupEnvelope {
    #[serde(rename = "ItemLookupResponse")]
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseBody {
    pub items: Items,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Items {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub item: Option<OneOrMany<RawItem>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawItem {
    #[serde(rename = "ASIN", default)]
    pub asin: Option<String>,
    #[serde(rename = "DetailPageURL", default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub large_image: Option<LargeImage>,
    #[serde(default)]
    pub image_sets: Option<ImageSets>,
    #[serde(default)]
    pub item_attributes: Option<ItemAttributes>,
    #[serde(default)]
    pub offers: Option<Offers>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LargeImage {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSets {
    #[serde(default)]
    pub image_set: Option<OneOrMany<ImageSet>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSet {
    #[serde(default)]
    pub large_image: Option<LargeImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemAttributes {
    #[serde(rename = "EAN", default)]
    pub ean: Option<String>,
    #[serde(rename = "UPC", default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub feature: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offers {
    #[serde(default)]
    pub offer: Option<OneOrMany<Offer>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offer {
    #[serde(default)]
    pub offer_listing: Option<OneOrMany<OfferListing>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferListing {
    #[serde(default)]
    pub price: Option<RawPrice>,
}

/// Listing price as sent by the provider: `Amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPrice {
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
