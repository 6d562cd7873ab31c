pub mod catalog;
pub mod normalize;
pub mod usecases;

pub use catalog::{Augmentation, CatalogService, ProductRepository, ServiceTimeouts};
pub use usecases::{GetProductByAsin, SearchProducts};
