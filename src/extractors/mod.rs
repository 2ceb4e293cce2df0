pub mod locator;
pub mod marker;
pub mod offer_extractor;

pub use locator::{BalancedBraces, FragmentLocator, GreedyBraces};
pub use marker::{last_candidate, marker_candidates, BOOTSTRAP_MARKER};
pub use offer_extractor::OfferExtractor;
