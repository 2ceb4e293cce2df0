use scraper::Html;
use tracing::{debug, error};
use crate::config::LocatorKind;
use crate::error::{Error, Result};
use crate::extractors::locator::{BalancedBraces, FragmentLocator, GreedyBraces};
use crate::extractors::marker::{last_candidate, marker_candidates, BOOTSTRAP_MARKER};
use crate::models::{CaptureBatch, GridBootstrap};

/// Pulls the offer grid out of a refurbished-store page.
pub struct OfferExtractor {
    marker: String,
    locator: Box<dyn FragmentLocator>,
}

impl Default for OfferExtractor {
    fn default() -> Self {
        Self::new(BOOTSTRAP_MARKER, GreedyBraces)
    }
}

impl OfferExtractor {
    pub fn new(marker: impl Into<String>, locator: impl FragmentLocator + 'static) -> Self {
        Self {
            marker: marker.into(),
            locator: Box::new(locator),
        }
    }

    pub fn with_locator(kind: LocatorKind) -> Self {
        match kind {
            LocatorKind::Greedy => Self::new(BOOTSTRAP_MARKER, GreedyBraces),
            LocatorKind::Balanced => Self::new(BOOTSTRAP_MARKER, BalancedBraces),
        }
    }

    pub fn from_html(&self, markup: &str) -> Result<CaptureBatch> {
        let fragment = {
            let document = Html::parse_document(markup);
            let candidates = marker_candidates(&document, &self.marker);
            last_candidate(candidates)
                .and_then(|text| self.locator.locate(text))
                .map(str::to_owned)
        };

        let Some(fragment) = fragment else {
            error!(marker = %self.marker, "No JSON found next to marker");
            return Err(Error::ExtractionNotFound {
                marker: self.marker.clone(),
            });
        };

        debug!(fragment_len = fragment.len(), "Located embedded payload");
        self.from_fragment(&fragment)
    }

    /// Decodes an already isolated payload and stamps it with the current
    /// time.
    pub fn from_fragment(&self, fragment: &str) -> Result<CaptureBatch> {
        let payload: GridBootstrap =
            serde_json::from_str(fragment).map_err(|e| Error::malformed(fragment, e))?;

        let batch = CaptureBatch::new(payload.tiles);
        debug!(
            records = batch.len(),
            captured_at = %batch.captured_at,
            "Decoded offer payload"
        );
        Ok(batch)
    }
}
