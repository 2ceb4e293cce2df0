use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use refurb_dump::config::Settings;
use refurb_dump::server::{self, AppState};
use refurb_dump::{HttpClient, Pipeline, RunOutput, SinkProvider, Source};

#[derive(Parser)]
#[command(name = "refurb-dump", about = "Dump the refurbished store's offer grid as ndjson")]
struct Cli {
    /// Store page to scrape (defaults to the configured URL)
    #[arg(long, conflicts_with_all = ["file_path", "server"])]
    url: Option<String>,

    /// Bucket where the dump is stored
    #[arg(long, conflicts_with_all = ["file_path", "server"])]
    bucket: Option<String>,

    /// File name for the dump (defaults to <YYYY-MM-DD>.json)
    #[arg(long, conflicts_with_all = ["file_path", "server"])]
    filename: Option<String>,

    /// Convert a local grid payload to ndjson on stdout instead of scraping
    #[arg(long, conflicts_with = "server")]
    file_path: Option<PathBuf>,

    /// Serve the dump pipeline over HTTP
    #[arg(long)]
    server: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::new().context("Failed to load configuration")?;
    let pipeline = Pipeline::from_settings(&settings);

    if let Some(path) = cli.file_path {
        let ndjson = pipeline
            .process_json_file(&path)
            .await
            .with_context(|| format!("unable to process '{}'", path.display()))?;
        print!("{}", ndjson);
        return Ok(());
    }

    let fetcher = Arc::new(HttpClient::new(&settings.source)?);
    let storage = SinkProvider::from_config(&settings.storage).await;

    if cli.server {
        let state = AppState::new(&settings, fetcher, storage);
        return server::serve(state, settings.server.port).await;
    }

    let Some(bucket) = cli
        .bucket
        .or_else(|| settings.storage.bucket.clone())
        .filter(|b| !b.is_empty())
    else {
        bail!("missing bucket");
    };
    let url = cli.url.unwrap_or_else(|| settings.source.url.clone());
    let sink = storage.bucket(&bucket);

    info!(url = %url, bucket = %bucket, "Starting dump");
    let source = Source::RemotePage {
        url: &url,
        fetcher: fetcher.as_ref(),
        sink: sink.as_ref(),
    };
    let output = pipeline
        .run(source, cli.filename.as_deref())
        .await
        .context("unable to dump")?;

    if let RunOutput::Stored { location, .. } = output {
        info!("Data available under: '{}'", location);
    }
    Ok(())
}
