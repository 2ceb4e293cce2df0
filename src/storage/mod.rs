pub mod local;
pub mod s3;

pub use local::LocalSink;
pub use s3::S3Sink;

use std::sync::Arc;
use async_trait::async_trait;
use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Durable destination for a serialized batch.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Writes `bytes` under `path` and returns the path it was stored at.
    async fn write(&self, bytes: Vec<u8>, path: &str, content_type: &str) -> Result<String>;

    /// Human-readable location of `path`, used in log lines and responses.
    fn location(&self, path: &str) -> String;
}

/// Configured storage backend, bound to a bucket per run.
#[derive(Clone)]
pub enum SinkProvider {
    S3(aws_sdk_s3::Client),
    Local(std::path::PathBuf),
}

impl SinkProvider {
    pub async fn from_config(storage: &StorageConfig) -> Self {
        match storage.backend {
            StorageBackend::S3 => Self::S3(s3::build_client(storage).await),
            StorageBackend::Local => Self::Local(storage.local_root.clone().into()),
        }
    }

    pub fn bucket(&self, name: &str) -> Arc<dyn Sink> {
        match self {
            Self::S3(client) => Arc::new(S3Sink::new(client.clone(), name)),
            Self::Local(root) => Arc::new(LocalSink::for_bucket(root.clone(), name)),
        }
    }
}
