use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use catalog_prices::clients::{CatalogProvider, CatalogRequest, HttpCatalogProvider};
use catalog_prices::config::ProviderConfig;
use catalog_prices::Error;

const LOOKUP_XML: &str = r#"<?xml version="1.0" ?>
<ItemLookupResponse xmlns="http://webservices.amazon.com/AWSECommerceService/2013-08-01">
  <Items>
    <Request><IsValid>True</IsValid></Request>
    <Item>
      <ASIN>B000123</ASIN>
      <ItemAttributes><EAN>8401234567890</EAN><Title>Phone</Title></ItemAttributes>
    </Item>
  </Items>
</ItemLookupResponse>"#;

/// Replies with scripted responses in order, repeating the last one.
#[derive(Clone)]
struct Script {
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Script {
    fn hits(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

async fn reply(State(script): State<Script>, RawQuery(query): RawQuery) -> (StatusCode, String) {
    script.queries.lock().unwrap().push(query.unwrap_or_default());

    let mut replies = script.replies.lock().unwrap();
    if replies.len() > 1 {
        replies.pop_front().unwrap()
    } else {
        replies.front().cloned().unwrap()
    }
}

struct StubProvider {
    base_url: String,
    script: Script,
    handle: tokio::task::JoinHandle<()>,
}

impl StubProvider {
    async fn spawn(replies: Vec<(StatusCode, &str)>) -> Self {
        let script = Script {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(|(status, body)| (status, body.to_string())).collect(),
            )),
            queries: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/onca/xml", get(reply))
            .with_state(script.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, script, handle }
    }

    fn client(&self, max_retries: u32) -> HttpCatalogProvider {
        HttpCatalogProvider::new(ProviderConfig {
            associate_tag: "tag-21".into(),
            access_key: "AKID".into(),
            secret_key: "secret".into(),
            locale: "ES".into(),
            endpoint: Some(self.base_url.clone()),
            timeout_secs: 10,
            max_retries,
            retry_base_ms: 10,
        })
        .unwrap()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn lookup() -> CatalogRequest {
    CatalogRequest::ItemLookup { item_id: "B000123".into() }
}

#[tokio::test]
async fn signed_lookup_is_parsed_into_a_tree() {
    let stub = StubProvider::spawn(vec![(StatusCode::OK, LOOKUP_XML)]).await;

    let value = stub.client(0).execute(lookup()).await.unwrap();

    assert_eq!(value["ItemLookupResponse"]["Items"]["Item"]["ASIN"], "B000123");
    assert_eq!(
        value["ItemLookupResponse"]["Items"]["Item"]["ItemAttributes"]["EAN"],
        "8401234567890"
    );

    let queries = stub.script.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("Operation=ItemLookup"));
    assert!(queries[0].contains("ItemId=B000123"));
    assert!(queries[0].contains("AWSAccessKeyId=AKID"));
    assert!(queries[0].contains("&Signature="));
}

#[tokio::test]
async fn throttled_call_is_retried() {
    let stub = StubProvider::spawn(vec![
        (StatusCode::SERVICE_UNAVAILABLE, "slow down"),
        (StatusCode::OK, LOOKUP_XML),
    ])
    .await;

    let value = stub.client(2).execute(lookup()).await.unwrap();

    assert_eq!(value["ItemLookupResponse"]["Items"]["Item"]["ASIN"], "B000123");
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn rate_limit_surfaces_after_last_retry() {
    let stub = StubProvider::spawn(vec![(StatusCode::TOO_MANY_REQUESTS, "")]).await;

    let err = stub.client(1).execute(lookup()).await.unwrap_err();

    assert!(matches!(err, Error::RateLimit));
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn error_status_is_not_retried() {
    let stub = StubProvider::spawn(vec![(
        StatusCode::BAD_REQUEST,
        "<ItemLookupErrorResponse><Error><Code>InvalidParameterValue</Code></Error></ItemLookupErrorResponse>",
    )])
    .await;

    let err = stub.client(2).execute(lookup()).await.unwrap_err();

    match err {
        Error::Provider { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("InvalidParameterValue"));
        }
        other => panic!("expected Provider error, got {other:?}"),
    }
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn malformed_body_is_an_xml_error() {
    let stub = StubProvider::spawn(vec![(StatusCode::OK, "<Items><Item></Items>")]).await;

    let err = stub.client(0).execute(lookup()).await.unwrap_err();

    assert!(matches!(err, Error::Xml(_)));
}
