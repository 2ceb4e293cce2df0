//! HTTP surface over the dump pipeline.
//!
//! `GET /?url=&bucket=&filename=` runs one remote dump per request.

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use http::StatusCode;
use serde::Deserialize;
use tracing::{error, info};
use crate::clients::Fetcher;
use crate::config::Settings;
use crate::services::{Pipeline, RunOutput, Source};
use crate::storage::SinkProvider;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub fetcher: Arc<dyn Fetcher>,
    pub storage: SinkProvider,
    pub default_url: String,
}

impl AppState {
    pub fn new(settings: &Settings, fetcher: Arc<dyn Fetcher>, storage: SinkProvider) -> Self {
        Self {
            pipeline: Arc::new(Pipeline::from_settings(settings)),
            fetcher,
            storage,
            default_url: settings.source.url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DumpQuery {
    url: Option<String>,
    bucket: Option<String>,
    filename: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dump_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn dump_handler(
    State(state): State<AppState>,
    Query(query): Query<DumpQuery>,
) -> (StatusCode, String) {
    let Some(bucket) = query.bucket.filter(|b| !b.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing bucket".to_string());
    };
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| state.default_url.clone());

    info!(url = %url, bucket = %bucket, "Dump requested");

    let sink = state.storage.bucket(&bucket);
    let source = Source::RemotePage {
        url: &url,
        fetcher: state.fetcher.as_ref(),
        sink: sink.as_ref(),
    };

    match state.pipeline.run(source, query.filename.as_deref()).await {
        Ok(RunOutput::Stored { location, .. }) => (
            StatusCode::OK,
            format!("Data available under: '{}'", location),
        ),
        Ok(RunOutput::Ndjson(text)) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, bucket = %bucket, "Dump failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("unable to dump: {}", e),
            )
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}
