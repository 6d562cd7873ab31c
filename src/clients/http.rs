use rquest::{Client, Response, RequestBuilder};
use rquest_util::Emulation;
use http::header::{HeaderMap, HeaderValue, ACCEPT};
use http::StatusCode;
use crate::error::{Error, Result};
use tracing::debug;

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(emulation: Emulation) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

        debug!(
            emulation = ?emulation,
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(emulation)
            .build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url);

        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        request
    }

    /// Sends `request`, turning throttling and access errors into typed errors.
    pub async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        debug!(operation = operation, "Sending request");

        let response = request.send().await?;

        debug!(
            status = response.status().as_u16(),
            operation = operation,
            "Response received"
        );

        match response.status() {
            // The catalog provider throttles with 503 as well as 429.
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                debug!(operation = operation, "Rate limit exceeded");
                Err(Error::RateLimit)
            },
            StatusCode::FORBIDDEN => {
                debug!(operation = operation, "Received 403 Forbidden");
                Err(Error::Forbidden)
            },
            _ => Ok(response)
        }
    }
}
