use std::path::{Component, Path, PathBuf};
use async_trait::async_trait;
use tokio::fs::File as TokioFile;
use tokio::io::{AsyncWriteExt, BufWriter as TokioBufWriter};
use tracing::{debug, error};
use crate::error::{Error, Result};
use crate::storage::Sink;

/// Writes dumps below a directory on the local filesystem. Bucket and path
/// are always resolved under `root`.
pub struct LocalSink {
    root: PathBuf,
    bucket: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bucket: PathBuf::new(),
        }
    }

    pub fn for_bucket(root: impl Into<PathBuf>, bucket: &str) -> Self {
        Self {
            root: root.into(),
            bucket: PathBuf::from(bucket),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = self.bucket.join(path);
        // Only plain names: no `..`, no absolute or prefixed paths
        let contained = relative.components().next().is_some()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !contained {
            error!(path = ?relative, root = ?self.root, "Refusing path outside storage root");
            return Err(Error::Sink(format!(
                "refusing to write '{}' outside storage root",
                relative.display()
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Sink for LocalSink {
    async fn write(&self, bytes: Vec<u8>, path: &str, content_type: &str) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = TokioFile::create(&target).await?;
        let mut writer = TokioBufWriter::new(file);
        writer.write_all(&bytes).await?;
        writer.flush().await?;

        debug!(
            target = ?target,
            bytes = bytes.len(),
            content_type = content_type,
            "File written"
        );
        Ok(path.to_string())
    }

    fn location(&self, path: &str) -> String {
        self.root.join(&self.bucket).join(Path::new(path)).display().to_string()
    }
}
