#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use refurb_dump::{Error, Fetcher, Result, Sink};

pub fn store_page(scripts: &[&str]) -> String {
    let body: String = scripts
        .iter()
        .map(|s| format!("<script type=\"text/javascript\">{s}</script>"))
        .collect();
    format!(
        "<!DOCTYPE html><html lang=\"fr-CH\"><head><title>Mac reconditionnés</title></head>\
         <body><div id=\"page\"><h1>Produits reconditionnés</h1>{body}</div></body></html>"
    )
}

pub const GRID: &str = r#"{"tiles":[{"partNumber":"FKGP3SM/A","title":"MacBook Pro 14 pouces reconditionné","productDetailsUrl":"/ch-fr/shop/product/FKGP3SM/A","lob":"mac","filters":{"dimensions":{"tsMemorySize":"16gb"}},"price":{"currentPrice":{"raw_amount":"1659.00"}},"omnitureModel":{"customerCommitString":"Livraison gratuite"}},{"partNumber":"FKGQ3SM/A","title":"MacBook Pro 14 pouces M3 reconditionné","lob":"mac","filters":{}}]}"#;

/// Serves a fixed body and counts calls.
pub struct StubFetcher {
    body: Vec<u8>,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// Answers every request with the given HTTP status.
pub struct StatusFetcher(pub u16);

#[async_trait]
impl Fetcher for StatusFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::Status {
            url: url.to_string(),
            status: self.0,
        })
    }
}

/// Sink that records how often it was called and always fails.
#[derive(Default)]
pub struct BrokenSink {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Sink for BrokenSink {
    async fn write(&self, _bytes: Vec<u8>, _path: &str, _content_type: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Sink("bucket does not exist".to_string()))
    }

    fn location(&self, path: &str) -> String {
        format!("broken://{}", path)
    }
}

/// Sink that never finishes within any reasonable timeout.
pub struct StalledSink;

#[async_trait]
impl Sink for StalledSink {
    async fn write(&self, _bytes: Vec<u8>, path: &str, _content_type: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(path.to_string())
    }

    fn location(&self, path: &str) -> String {
        format!("stalled://{}", path)
    }
}
