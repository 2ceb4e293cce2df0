pub mod ndjson;

pub use ndjson::to_ndjson;
