use std::fmt;
use std::io;
use std::path::Path;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use crate::clients::Fetcher;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::extractors::OfferExtractor;
use crate::models::CaptureBatch;
use crate::storage::{Sink, JSON_CONTENT_TYPE};
use crate::transform::to_ndjson;

/// Where a run gets its offers from.
pub enum Source<'a> {
    /// Fetch a store page, extract the embedded grid and store the ndjson.
    RemotePage {
        url: &'a str,
        fetcher: &'a dyn Fetcher,
        sink: &'a dyn Sink,
    },
    /// Parse an already isolated payload and hand the ndjson back.
    RawFragment { json: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    Stored { path: String, location: String },
    Ndjson(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Extracting,
    Transforming,
    Storing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Transforming => "transforming",
            Stage::Storing => "storing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// `<YYYY-MM-DD>.json` for the given instant.
pub fn default_filename(now: DateTime<Utc>) -> String {
    format!("{}.json", now.format("%Y-%m-%d"))
}

pub struct Pipeline {
    extractor: OfferExtractor,
    prefix: String,
    write_timeout: Duration,
}

impl Pipeline {
    pub fn new(extractor: OfferExtractor, prefix: impl Into<String>, write_timeout: Duration) -> Self {
        Self {
            extractor,
            prefix: prefix.into(),
            write_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            OfferExtractor::with_locator(settings.source.locator),
            settings.storage.prefix.clone(),
            settings.storage.write_timeout(),
        )
    }

    pub fn destination(&self, filename: Option<&str>) -> String {
        let filename = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_filename(Utc::now()),
        };
        if self.prefix.is_empty() {
            filename
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), filename)
        }
    }

    pub async fn run(&self, source: Source<'_>, filename: Option<&str>) -> Result<RunOutput> {
        let mut stage = Stage::Idle;
        let result = match source {
            Source::RemotePage { url, fetcher, sink } => {
                self.remote_page(url, fetcher, sink, filename, &mut stage).await
            }
            Source::RawFragment { json } => {
                self.raw_fragment(json, &mut stage).map(RunOutput::Ndjson)
            }
        };

        finish(&mut stage, &result);
        result
    }

    /// Bypass mode over a payload stored on disk.
    pub async fn process_json_file(&self, path: &Path) -> Result<String> {
        let mut stage = Stage::Idle;
        let result = match tokio::fs::read_to_string(path).await {
            Ok(json) => self.raw_fragment(&json, &mut stage),
            Err(e) => Err(Error::from(e)),
        };

        finish(&mut stage, &result);
        result
    }

    async fn remote_page(
        &self,
        url: &str,
        fetcher: &dyn Fetcher,
        sink: &dyn Sink,
        filename: Option<&str>,
        stage: &mut Stage,
    ) -> Result<RunOutput> {
        advance(stage, Stage::Fetching);
        info!(url = url, "Fetching data");
        let body = fetcher.fetch(url).await?;

        advance(stage, Stage::Extracting);
        // the page is decoded leniently; the payload itself must still be valid JSON
        let markup = String::from_utf8_lossy(&body);
        let batch = self.extractor.from_html(&markup)?;
        info!(records = batch.len(), "Extracted offers");

        let bytes = self.transform(&batch, stage)?;

        advance(stage, Stage::Storing);
        let path = self.destination(filename);
        let path = self.store(sink, bytes, &path).await?;
        let location = sink.location(&path);
        info!(location = %location, "Data available");

        Ok(RunOutput::Stored { path, location })
    }

    fn raw_fragment(&self, json: &str, stage: &mut Stage) -> Result<String> {
        advance(stage, Stage::Extracting);
        let batch = self.extractor.from_fragment(json)?;

        let bytes = self.transform(&batch, stage)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn transform(&self, batch: &CaptureBatch, stage: &mut Stage) -> Result<Vec<u8>> {
        advance(stage, Stage::Transforming);
        to_ndjson(batch)
    }

    async fn store(&self, sink: &dyn Sink, bytes: Vec<u8>, path: &str) -> Result<String> {
        info!(path = path, bytes = bytes.len(), "Storing data");

        match tokio::time::timeout(self.write_timeout, sink.write(bytes, path, JSON_CONTENT_TYPE)).await {
            Ok(written) => written,
            Err(_) => Err(Error::Sink(format!(
                "write to '{}' timed out after {:?}",
                path, self.write_timeout
            ))),
        }
    }
}

fn finish<T>(stage: &mut Stage, result: &Result<T>) {
    match result {
        Ok(_) => advance(stage, Stage::Done),
        Err(e) => {
            error!(stage = %stage, error = %e, "Pipeline failed");
            advance(stage, Stage::Failed);
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "Pipeline stage");
    *stage = next;
}
