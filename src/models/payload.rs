use serde::Deserialize;
use super::offer::{null_as_default, Offer};

/// The object embedded next to the `REFURB_GRID_BOOTSTRAP` marker. Keys other
/// than `tiles` are ignored; a missing or `null` `tiles` is an empty grid.
#[derive(Debug, Deserialize)]
pub struct GridBootstrap {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tiles: Vec<Offer>,
}
