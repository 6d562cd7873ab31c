//! Mapping of raw catalog items into [`Product`]s and price list handling.

use indexmap::IndexSet;
use tracing::warn;

use crate::models::{
    ImageSets, ItemAttributes, LargeImage, Offers, OneOrMany, PriceValue, Product, ProductPrice,
    RawItem, RawPrice,
};

/// Display name of the catalog provider's own listing.
pub const STORE_NAME: &str = "Amazon";
pub const STORE_LOGO: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a9/Amazon_logo.svg/100px-Amazon_logo.svg.png";

/// Maps one catalog item. The provider's own listing is always the first and
/// only price of the result; its amount is 0 when the item has no offer.
pub fn map_product(item: RawItem) -> Product {
    let RawItem {
        asin,
        detail_page_url,
        large_image,
        image_sets,
        item_attributes,
        offers,
    } = item;

    let attributes = item_attributes.unwrap_or_default();
    let url = detail_page_url.unwrap_or_default();
    let primary = primary_price(offers, &url);

    Product {
        asin: asin.unwrap_or_default(),
        description: map_description(&attributes),
        images: map_images(large_image, image_sets),
        name: attributes.title.unwrap_or_default(),
        ean: attributes.ean.unwrap_or_default(),
        upc: attributes.upc.unwrap_or_default(),
        url,
        prices: vec![primary],
    }
}

pub fn map_description(attributes: &ItemAttributes) -> String {
    attributes
        .feature
        .clone()
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .join(" ")
}

/// Primary large image first, then the large image of every alternate set,
/// without duplicates.
pub fn map_images(large_image: Option<LargeImage>, image_sets: Option<ImageSets>) -> Vec<String> {
    let primary = large_image.and_then(|image| image.url);
    let alternates = image_sets
        .and_then(|sets| sets.image_set)
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|set| set.large_image.and_then(|image| image.url));

    primary
        .into_iter()
        .chain(alternates)
        .filter(|url| !url.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn primary_price(offers: Option<Offers>, url: &str) -> ProductPrice {
    let listing_price = offers
        .and_then(|offers| offers.offer)
        .and_then(OneOrMany::into_first)
        .and_then(|offer| offer.offer_listing)
        .and_then(OneOrMany::into_first)
        .and_then(|listing| listing.price);

    let (amount, currency) = match listing_price {
        Some(RawPrice { amount: Some(amount), currency_code }) => {
            (parse_minor_units(&amount), currency_code.unwrap_or_default())
        }
        _ => (0.0, String::new()),
    };

    ProductPrice {
        store: STORE_NAME.to_string(),
        store_image: STORE_LOGO.to_string(),
        url: url.to_string(),
        price: PriceValue::Amount(amount),
        currency,
    }
}

/// Converts an amount in minor units (`"1999"`) to a decimal amount (`19.99`).
/// Assumes two minor digits; unparsable input counts as unknown (0).
pub fn parse_minor_units(amount: &str) -> f64 {
    match amount.trim().parse::<i64>() {
        Ok(minor) => minor as f64 / 100.0,
        Err(e) => {
            warn!(amount = amount, error = %e, "Unparsable listing amount");
            0.0
        }
    }
}

/// `19.5` → `"19,50"`; zero, negative and non-finite amounts → `""`.
pub fn format_price(amount: f64) -> String {
    if amount.is_finite() && amount > 0.0 {
        format!("{amount:.2}").replace('.', ",")
    } else {
        String::new()
    }
}

pub fn format_prices(prices: Vec<ProductPrice>) -> Vec<ProductPrice> {
    prices
        .into_iter()
        .map(|price| match price.price {
            PriceValue::Amount(amount) => ProductPrice {
                price: PriceValue::Formatted(format_price(amount)),
                ..price
            },
            PriceValue::Formatted(_) => price,
        })
        .collect()
}

/// Stable ascending sort by numeric amount. Must run before formatting.
pub fn sort_prices(prices: &mut [ProductPrice]) {
    prices.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
}

fn sort_key(price: &ProductPrice) -> f64 {
    price.price.amount().unwrap_or(f64::INFINITY)
}
