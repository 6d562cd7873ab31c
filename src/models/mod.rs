mod product;
mod price_record;
mod response;

pub use product::{PriceValue, Product, ProductPrice, SearchResult};
pub use price_record::{PriceRecord, StoredPrice};
pub use response::{
    ImageSet, ImageSets, ItemAttributes, ItemLookupEnvelope, ItemSearchEnvelope, Items,
    LargeImage, Offer, OfferListing, Offers, OneOrMany, RawItem, RawPrice, ResponseBody,
};
