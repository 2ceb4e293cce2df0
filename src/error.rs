use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("HTTP response from '{url}' is not 2xx: {status}")]
    Status { url: String, status: u16 },

    #[error("unable to find valid JSON next to '{marker}' string")]
    ExtractionNotFound { marker: String },

    #[error("unable to parse JSON '{prefix}': {source}")]
    MalformedPayload {
        prefix: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize offer: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Builds a `MalformedPayload` keeping only the first ten characters of
    /// the offending fragment.
    pub fn malformed(fragment: &str, source: serde_json::Error) -> Self {
        Error::MalformedPayload {
            prefix: fragment.chars().take(10).collect(),
            source,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. })
    }
}
