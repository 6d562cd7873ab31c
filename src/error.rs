use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Message handed to callers for any provider-side failure.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "An error has occurred processing the request";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Does not exist any product with asin {0}")]
    NotFound(String),

    #[error("{}", UPSTREAM_FAILURE_MESSAGE)]
    Upstream,

    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Provider responded with {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Forbidden - Access denied")]
    Forbidden,

    #[error("{service} call timed out")]
    Timeout { service: &'static str },

    #[error("Price store error: {0}")]
    PriceStore(#[from] mongodb::error::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Signing error: {0}")]
    Signing(String),
}

impl Error {
    /// Transient failures worth another attempt against the provider.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimit | Error::Timeout { .. })
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
