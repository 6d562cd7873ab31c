use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tracing::{debug, warn};

use crate::config::PriceStoreConfig;
use crate::error::{Error, Result};
use crate::models::PriceRecord;
use crate::utils::with_timeout;

/// Upper bound on closing a lookup's client once its query has finished.
pub const RELEASE_GRACE: Duration = Duration::from_secs(1);

/// Keyed lookup of competitor price records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn find_prices(&self, ean: &str) -> Result<Option<PriceRecord>>;
}

/// Price store backed by a MongoDB collection keyed by `_id = ean`.
///
/// A client is created for every lookup and shut down before the lookup
/// returns, whatever the outcome. The query is bounded by the configured
/// timeout and the shutdown by [`RELEASE_GRACE`], so a lookup never takes
/// longer than their sum.
pub struct MongoPriceStore {
    options: ClientOptions,
    database: String,
    collection: String,
    timeout: Duration,
}

impl MongoPriceStore {
    pub async fn new(config: &PriceStoreConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.connection_string).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(config.timeout());
        options.server_selection_timeout = Some(config.timeout());

        debug!(
            database = %config.database,
            collection = %config.collection,
            "Configured price store"
        );

        Ok(Self {
            options,
            database: config.database.clone(),
            collection: config.collection.clone(),
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl PriceStore for MongoPriceStore {
    async fn find_prices(&self, ean: &str) -> Result<Option<PriceRecord>> {
        let client = Client::with_options(self.options.clone())?;

        let result = {
            // Shutdown waits for every handle, so the collection must be gone first.
            let collection = client
                .database(&self.database)
                .collection::<PriceRecord>(&self.collection);

            with_timeout(self.timeout, "price store", async {
                collection.find_one(doc! { "_id": ean }).await.map_err(Error::from)
            })
            .await
        };

        if tokio::time::timeout(RELEASE_GRACE, client.shutdown()).await.is_err() {
            warn!(ean = ean, "Price store client did not shut down in time");
        }

        debug!(
            ean = ean,
            found = matches!(result, Ok(Some(_))),
            "Price store lookup finished"
        );

        result
    }
}
