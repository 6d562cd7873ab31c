pub mod catalog;
pub mod http;
pub mod signing;
pub mod xml;

pub use catalog::{CatalogProvider, CatalogRequest, HttpCatalogProvider};
pub use http::HttpClient;
