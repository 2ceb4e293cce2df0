use serde::{Serialize, Serializer};
use chrono::{DateTime, SecondsFormat, Utc};
use super::offer::{JsonMap, Offer};

/// Borrowed view of an offer stamped with its batch's capture time. Field
/// order here is the ndjson key order.
#[derive(Debug, Serialize)]
pub struct OfferRecord<'a> {
    #[serde(rename = "dateTime", serialize_with = "rfc3339_utc")]
    pub captured_at: &'a DateTime<Utc>,
    pub filters: &'a Option<JsonMap>,
    pub lob: &'a str,
    #[serde(rename = "omnitureModel")]
    pub omniture_model: &'a Option<JsonMap>,
    #[serde(rename = "partNumber")]
    pub part_number: &'a str,
    #[serde(skip_serializing_if = "is_absent")]
    pub price: &'a Option<JsonMap>,
    #[serde(rename = "productDetailsUrl")]
    pub product_details_url: &'a str,
    pub title: &'a str,
}

impl<'a> OfferRecord<'a> {
    pub fn new(offer: &'a Offer, captured_at: &'a DateTime<Utc>) -> Self {
        Self {
            captured_at,
            filters: &offer.filters,
            lob: &offer.line_of_business,
            omniture_model: &offer.merchandising_model,
            part_number: &offer.part_number,
            price: &offer.pricing,
            product_details_url: &offer.product_details_url,
            title: &offer.title,
        }
    }
}

// `price` is dropped when missing and when it is an empty object.
fn is_absent(price: &&Option<JsonMap>) -> bool {
    price.as_ref().is_none_or(|map| map.is_empty())
}

fn rfc3339_utc<S: Serializer>(ts: &&DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
