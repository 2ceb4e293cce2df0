pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod transform;

pub use clients::{Fetcher, HttpClient};
pub use config::Settings;
pub use error::{Error, Result};
pub use extractors::OfferExtractor;
pub use models::{CaptureBatch, Offer};
pub use services::{Pipeline, RunOutput, Source};
pub use storage::{LocalSink, S3Sink, Sink, SinkProvider};
pub use transform::to_ndjson;
