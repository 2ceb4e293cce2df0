use tracing::debug;
use crate::error::{Error, Result};
use crate::models::{CaptureBatch, OfferRecord};

/// Serializes each offer of the batch, in order, as one JSON document per
/// line. Either every record is written or an error is returned.
pub fn to_ndjson(batch: &CaptureBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    for offer in &batch.records {
        let record = OfferRecord::new(offer, &batch.captured_at);
        serde_json::to_writer(&mut buffer, &record).map_err(Error::Serialization)?;
        buffer.push(b'\n');
    }

    debug!(
        records = batch.len(),
        bytes = buffer.len(),
        "Serialized batch as ndjson"
    );
    Ok(buffer)
}
