use serde::{Deserialize, Deserializer};
use chrono::{DateTime, Utc};

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// One refurbished listing, as found in the page's grid payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Offer {
    #[serde(rename = "partNumber", default, deserialize_with = "null_as_default")]
    pub part_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "productDetailsUrl", default, deserialize_with = "null_as_default")]
    pub product_details_url: String,
    #[serde(rename = "lob", default, deserialize_with = "null_as_default")]
    pub line_of_business: String,
    #[serde(default)]
    pub filters: Option<JsonMap>,
    #[serde(rename = "price", default)]
    pub pricing: Option<JsonMap>,
    #[serde(rename = "omnitureModel", default)]
    pub merchandising_model: Option<JsonMap>,
}

/// Offers extracted in one run, all sharing a single capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureBatch {
    pub captured_at: DateTime<Utc>,
    pub records: Vec<Offer>,
}

impl CaptureBatch {
    pub fn new(records: Vec<Offer>) -> Self {
        Self {
            captured_at: Utc::now(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// An explicit `null` decodes like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
