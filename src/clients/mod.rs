pub mod http;

pub use http::HttpClient;

use async_trait::async_trait;
use crate::error::Result;

/// Retrieves the raw body behind a URL. Non-2xx answers are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
