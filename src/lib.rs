//! Product catalog aggregation: catalog provider search and lookup,
//! normalization into a canonical product model and best-effort merging of
//! competitor prices from a side store.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use error::{Error, Result};
