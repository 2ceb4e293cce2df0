use async_trait::async_trait;
use rquest::{Client, RequestBuilder};
use rquest_util::Emulation;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use crate::clients::Fetcher;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(source: &SourceConfig) -> Result<Self> {
        Self::with_emulation(source, Emulation::Chrome133)
    }

    pub fn with_emulation(source: &SourceConfig, emulation: Emulation) -> Result<Self> {
        let mut headers = HeaderMap::new();

        // Add configured headers, skipping invalid ones
        for (key, value) in source.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(header_key = key, "Adding header");
            } else {
                error!(
                    header_key = key,
                    header_value = value,
                    "Invalid header value"
                );
            }
        }

        debug!(
            emulation = ?emulation,
            timeout_secs = source.timeout_secs,
            "Creating client with emulation"
        );

        let client = Client::builder()
            .emulation(emulation)
            .timeout(source.timeout())
            .build()?;

        Ok(Self { client, headers })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url);

        // Apply headers to each request
        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        request
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = url, "Sending request");

        let response = self.get(url).send().await.map_err(|e| {
            error!(error = %e, url = url, "Request failed");
            Error::from(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = url, "Response received");

        // Only 2xx bodies are handed to the extractor
        if !status.is_success() {
            error!(status = status.as_u16(), url = url, "Unexpected status code");
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Read response body");
        Ok(body.to_vec())
    }
}
