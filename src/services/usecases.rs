use std::sync::Arc;

use crate::error::Result;
use crate::models::{Product, SearchResult};
use crate::services::catalog::ProductRepository;

/// Fetches one product, with competitor prices, by its ASIN.
#[derive(Clone)]
pub struct GetProductByAsin {
    repository: Arc<dyn ProductRepository>,
}

impl GetProductByAsin {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, asin: &str) -> Result<Product> {
        self.repository.get_by_asin(asin).await
    }
}

#[derive(Clone)]
pub struct SearchProducts {
    repository: Arc<dyn ProductRepository>,
}

impl SearchProducts {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, filter: &str, page: u32, category: &str) -> Result<SearchResult<Product>> {
        self.repository.search(filter, page, category).await
    }
}
