pub mod prices;

pub use prices::{MongoPriceStore, PriceStore, RELEASE_GRACE};
