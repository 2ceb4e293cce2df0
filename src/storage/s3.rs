use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use async_trait::async_trait;
use tracing::{debug, error};
use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::storage::Sink;

/// Builds an S3 client from configuration. Static credentials are used when
/// both keys are set, otherwise the default AWS provider chain. A custom
/// endpoint (MinIO and friends) switches to path-style addressing.
pub async fn build_client(storage: &StorageConfig) -> S3Client {
    debug!(
        endpoint = ?storage.endpoint,
        region = %storage.region,
        "Initializing S3 client"
    );

    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(storage.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared);

    // Static credentials override the provider chain
    if let (Some(access_key), Some(secret_key)) = (&storage.access_key, &storage.secret_key) {
        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "static-credentials",
        );
        builder = builder.credentials_provider(credentials);
    }

    // Custom endpoint (MinIO)
    if let Some(endpoint) = &storage.endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    S3Client::from_conf(builder.build())
}

pub struct S3Sink {
    client: S3Client,
    bucket: String,
}

impl S3Sink {
    pub fn new(client: S3Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl Sink for S3Sink {
    async fn write(&self, bytes: Vec<u8>, path: &str, content_type: &str) -> Result<String> {
        debug!(
            bucket = %self.bucket,
            key = path,
            bytes = bytes.len(),
            "Uploading object"
        );

        // Upload object
        let result = self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!(key = path, "Object uploaded successfully");
                Ok(path.to_string())
            }
            Err(e) => {
                let error_msg = match &e {
                    SdkError::ServiceError(service_error) => {
                        error!(
                            error = ?service_error.err(),
                            raw_response = ?service_error.raw(),
                            "S3 service error"
                        );
                        format!("S3 service error: {}", service_error.err())
                    }
                    _ => {
                        error!(error = %DisplayErrorContext(&e), "S3 upload error");
                        format!("S3 error: {}", DisplayErrorContext(&e))
                    }
                };
                Err(Error::Sink(error_msg))
            }
        }
    }

    fn location(&self, path: &str) -> String {
        format!("s3://{}/{}", self.bucket, path)
    }
}
