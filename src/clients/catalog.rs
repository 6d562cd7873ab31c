use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use rquest_util::Emulation;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::clients::http::HttpClient;
use crate::clients::{signing, xml};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::utils::retry_with_backoff;

/// Attributes requested for every item, in a single call.
pub const RESPONSE_GROUP: &str = "ItemAttributes,Offers,Images";

const SERVICE: &str = "AWSECommerceService";
const API_VERSION: &str = "2013-08-01";
const REQUEST_PATH: &str = "/onca/xml";
const MAX_LOGGED_BODY: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    ItemSearch {
        page: u32,
        keywords: String,
        search_index: String,
    },
    ItemLookup {
        item_id: String,
    },
}

impl CatalogRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            CatalogRequest::ItemSearch { .. } => "ItemSearch",
            CatalogRequest::ItemLookup { .. } => "ItemLookup",
        }
    }

    /// Operation-specific parameters, `ResponseGroup` included.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            CatalogRequest::ItemSearch { page, keywords, search_index } => vec![
                ("ItemPage", page.to_string()),
                ("Keywords", keywords.clone()),
                ("ResponseGroup", RESPONSE_GROUP.to_string()),
                ("SearchIndex", search_index.clone()),
            ],
            CatalogRequest::ItemLookup { item_id } => vec![
                ("IdType", "ASIN".to_string()),
                ("ItemId", item_id.clone()),
                ("ResponseGroup", RESPONSE_GROUP.to_string()),
            ],
        }
    }
}

/// Request/response boundary of the catalog provider.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn execute(&self, request: CatalogRequest) -> Result<Value>;
}

/// Regional web service host for a marketplace locale.
pub fn host_for_locale(locale: &str) -> Option<&'static str> {
    let host = match locale.to_ascii_uppercase().as_str() {
        "US" => "webservices.amazon.com",
        "UK" | "GB" => "webservices.amazon.co.uk",
        "DE" => "webservices.amazon.de",
        "FR" => "webservices.amazon.fr",
        "ES" => "webservices.amazon.es",
        "IT" => "webservices.amazon.it",
        "JP" => "webservices.amazon.co.jp",
        "CA" => "webservices.amazon.ca",
        "IN" => "webservices.amazon.in",
        "BR" => "webservices.amazon.com.br",
        "MX" => "webservices.amazon.com.mx",
        "CN" => "webservices.amazon.cn",
        _ => return None,
    };
    Some(host)
}

pub struct HttpCatalogProvider {
    http: HttpClient,
    config: ProviderConfig,
    scheme: &'static str,
    host: String,
}

/// Splits an endpoint override into scheme and host, defaulting to https.
fn split_endpoint(endpoint: &str) -> (&'static str, String) {
    if let Some(host) = endpoint.strip_prefix("http://") {
        ("http", host.trim_end_matches('/').to_string())
    } else {
        let host = endpoint.strip_prefix("https://").unwrap_or(endpoint);
        ("https", host.trim_end_matches('/').to_string())
    }
}

impl HttpCatalogProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let (scheme, host) = match (&config.endpoint, host_for_locale(&config.locale)) {
            (Some(endpoint), _) => split_endpoint(endpoint),
            (None, Some(host)) => ("https", host.to_string()),
            (None, None) => {
                warn!(locale = %config.locale, "Unknown locale, using US marketplace");
                ("https", "webservices.amazon.com".to_string())
            }
        };

        debug!(scheme = scheme, host = %host, "Creating catalog provider");

        Ok(Self {
            http: HttpClient::new(Emulation::Chrome133)?,
            config,
            scheme,
            host,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Builds the signed request URL for `request` at `timestamp`.
    pub fn signed_url(&self, request: &CatalogRequest, timestamp: DateTime<Utc>) -> Result<String> {
        let mut params: BTreeMap<String, String> = request
            .params()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();

        params.insert("Service".to_string(), SERVICE.to_string());
        params.insert("Operation".to_string(), request.operation().to_string());
        params.insert("AWSAccessKeyId".to_string(), self.config.access_key.clone());
        params.insert("AssociateTag".to_string(), self.config.associate_tag.clone());
        params.insert("Version".to_string(), API_VERSION.to_string());
        params.insert(
            "Timestamp".to_string(),
            timestamp.format("%Y-%m-%dT%H:%M:%S.000Z").to_string(),
        );

        let query = signing::canonical_query(&params);
        let signature = signing::sign(&self.config.secret_key, &self.host, REQUEST_PATH, &query)?;

        Ok(format!(
            "{}://{}{}?{}&Signature={}",
            self.scheme,
            self.host,
            REQUEST_PATH,
            query,
            urlencoding::encode(&signature)
        ))
    }

    async fn execute_once(&self, request: &CatalogRequest) -> Result<Value> {
        let operation = request.operation();
        let url = self.signed_url(request, Utc::now())?;

        let response = self.http.send(operation, self.http.get(&url)).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let body = truncate_for_log(body, MAX_LOGGED_BODY);
            error!(
                status = status.as_u16(),
                operation = operation,
                body = %body,
                "Catalog provider returned an error"
            );
            return Err(Error::Provider { status: status.as_u16(), body });
        }

        xml::to_value(&body)
    }
}

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
        s.push('…');
    }
    s
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn execute(&self, request: CatalogRequest) -> Result<Value> {
        let request = &request;
        let retries = self.config.max_retries;
        retry_with_backoff(retries, self.config.retry_base_ms, move || async move {
            self.execute_once(request).await
        })
        .await
    }
}
