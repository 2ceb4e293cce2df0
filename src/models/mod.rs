mod offer;
mod payload;
mod record;

pub use offer::{CaptureBatch, JsonMap, Offer};
pub use payload::GridBootstrap;
pub use record::OfferRecord;
