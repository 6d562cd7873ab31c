use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::clients::{CatalogProvider, CatalogRequest};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{
    ItemLookupEnvelope, ItemSearchEnvelope, OneOrMany, Product, ProductPrice, SearchResult,
};
use crate::services::normalize;
use crate::store::prices::RELEASE_GRACE;
use crate::store::PriceStore;
use crate::utils::with_timeout;

/// Upper bound on the page count reported to callers.
pub const MAX_TOTAL_PAGES: u32 = 5;
/// The provider rejects empty keywords.
pub const EMPTY_KEYWORDS: &str = " ";
pub const ALL_CATEGORIES: &str = "All";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn search(&self, filter: &str, page: u32, category: &str) -> Result<SearchResult<Product>>;

    async fn get_by_asin(&self, asin: &str) -> Result<Product>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTimeouts {
    pub provider: Duration,
    pub price_store: Duration,
}

impl ServiceTimeouts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            provider: settings.provider.timeout(),
            price_store: settings.price_store.timeout(),
        }
    }
}

/// Outcome of the best-effort competitor price lookup.
#[derive(Debug)]
pub enum Augmentation {
    Prices(Vec<ProductPrice>),
    Missing,
    /// The lookup failed; the product keeps only its catalog price.
    Degraded(Error),
}

impl Augmentation {
    pub fn into_prices(self) -> Vec<ProductPrice> {
        match self {
            Augmentation::Prices(prices) => prices,
            Augmentation::Missing | Augmentation::Degraded(_) => Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    price_store: Arc<dyn PriceStore>,
    timeouts: ServiceTimeouts,
}

impl CatalogService {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        price_store: Arc<dyn PriceStore>,
        timeouts: ServiceTimeouts,
    ) -> Self {
        Self { provider, price_store, timeouts }
    }

    pub fn search_request(filter: &str, page: u32, category: &str) -> CatalogRequest {
        let keywords = if filter.is_empty() { EMPTY_KEYWORDS } else { filter };
        let search_index = if category.is_empty() { ALL_CATEGORIES } else { category };

        CatalogRequest::ItemSearch {
            page: page.max(1),
            keywords: keywords.to_string(),
            search_index: search_index.to_string(),
        }
    }

    /// Looks up competitor prices for `ean`. Never fails: errors and timeouts
    /// come back as [`Augmentation::Degraded`].
    ///
    /// The store applies `price_store` to its own query, so the deadline here
    /// adds room for it to release its connection afterwards.
    pub async fn augment(&self, ean: &str) -> Augmentation {
        if ean.is_empty() {
            debug!("Product has no EAN, skipping price store lookup");
            return Augmentation::Missing;
        }

        let limit = self.timeouts.price_store + RELEASE_GRACE * 2;
        let lookup = self.price_store.find_prices(ean);
        match with_timeout(limit, "price store", lookup).await {
            Ok(Some(record)) => Augmentation::Prices(record.into_prices()),
            Ok(None) => Augmentation::Missing,
            Err(e) => {
                warn!(
                    error = %e,
                    ean = ean,
                    "Price store lookup failed, returning catalog price only"
                );
                Augmentation::Degraded(e)
            }
        }
    }

    async fn call_provider(&self, request: CatalogRequest) -> Result<Value> {
        let operation = request.operation();
        let call = self.provider.execute(request);

        with_timeout(self.timeouts.provider, "catalog provider", call)
            .await
            .map_err(|e| {
                error!(error = %e, operation = operation, "Catalog provider call failed");
                Error::Upstream
            })
    }
}

fn decode<T: DeserializeOwned>(operation: &str, raw: Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| {
        error!(error = %e, operation = operation, "Unexpected catalog response shape");
        Error::Upstream
    })
}

#[async_trait]
impl ProductRepository for CatalogService {
    async fn search(&self, filter: &str, page: u32, category: &str) -> Result<SearchResult<Product>> {
        let request = Self::search_request(filter, page, category);
        let page = page.max(1);
        let operation = request.operation();

        let raw = self.call_provider(request).await?;
        let envelope: ItemSearchEnvelope = decode(operation, raw)?;
        let items = envelope.response.items;

        let products: Vec<Product> = items
            .item
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let mut product = normalize::map_product(item);
                product.prices = normalize::format_prices(product.prices);
                product
            })
            .collect();

        let total_pages = if products.is_empty() {
            1
        } else {
            items.total_pages.unwrap_or(1).clamp(1, MAX_TOTAL_PAGES)
        };

        info!(
            filter = filter,
            category = category,
            page = page,
            items = products.len(),
            total_pages = total_pages,
            "Catalog search completed"
        );

        Ok(SearchResult {
            items: products,
            page,
            total_pages,
        })
    }

    async fn get_by_asin(&self, asin: &str) -> Result<Product> {
        let request = CatalogRequest::ItemLookup { item_id: asin.to_string() };
        let operation = request.operation();

        let raw = self.call_provider(request).await?;
        let envelope: ItemLookupEnvelope = decode(operation, raw)?;

        let item = envelope
            .response
            .items
            .item
            .and_then(OneOrMany::into_first)
            .ok_or_else(|| {
                info!(asin = asin, "No catalog item for asin");
                Error::NotFound(asin.to_string())
            })?;

        let mut product = normalize::map_product(item);

        let augmentation = self.augment(&product.ean).await;
        product.prices.extend(augmentation.into_prices());
        normalize::sort_prices(&mut product.prices);
        product.prices = normalize::format_prices(product.prices);

        info!(
            asin = asin,
            prices = product.prices.len(),
            "Catalog lookup completed"
        );

        Ok(product)
    }
}
