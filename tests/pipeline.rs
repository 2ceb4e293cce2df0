mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;
use chrono::Utc;
use serde_json::Value;
use refurb_dump::services::default_filename;
use refurb_dump::{Error, LocalSink, OfferExtractor, Pipeline, RunOutput, Sink, Source};

use common::{store_page, BrokenSink, StalledSink, StatusFetcher, StubFetcher, GRID};

fn pipeline() -> Pipeline {
    Pipeline::new(OfferExtractor::default(), "dump", Duration::from_secs(60))
}

#[tokio::test]
async fn remote_page_is_stored_as_ndjson() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LocalSink::new(dir.path().join("offers"));
    let fetcher = StubFetcher::new(store_page(&[&format!("window.REFURB_GRID_BOOTSTRAP = {GRID};")]));

    let output = pipeline()
        .run(
            Source::RemotePage { url: "https://store.test/refurb", fetcher: &fetcher, sink: &sink },
            Some("macbook-pro.json"),
        )
        .await
        .unwrap();

    let RunOutput::Stored { path, location } = output else {
        panic!("expected a stored dump");
    };
    assert_eq!(path, "dump/macbook-pro.json");
    assert_eq!(location, sink.location("dump/macbook-pro.json"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    let written = std::fs::read_to_string(dir.path().join("offers/dump/macbook-pro.json")).unwrap();
    let lines: Vec<Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["partNumber"], "FKGP3SM/A");
    assert_eq!(lines[0]["price"]["currentPrice"]["raw_amount"], "1659.00");
    assert_eq!(lines[1]["partNumber"], "FKGQ3SM/A");
    assert!(lines[1].get("price").is_none());
    assert_eq!(lines[0]["dateTime"], lines[1]["dateTime"]);
}

#[tokio::test]
async fn default_filename_is_todays_date() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LocalSink::new(dir.path());
    let fetcher = StubFetcher::new(store_page(&[&format!("REFURB_GRID_BOOTSTRAP = {GRID};")]));

    let output = pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &sink }, None)
        .await
        .unwrap();

    let expected = format!("dump/{}", default_filename(Utc::now()));
    assert!(matches!(output, RunOutput::Stored { ref path, .. } if *path == expected));
    assert!(dir.path().join(&expected).exists());
}

#[tokio::test]
async fn empty_grid_stores_an_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = LocalSink::new(dir.path());
    let fetcher = StubFetcher::new(store_page(&[r#"REFURB_GRID_BOOTSTRAP = {"tiles":[]};"#]));

    pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &sink }, Some("empty.json"))
        .await
        .unwrap();

    assert_eq!(std::fs::read(dir.path().join("dump/empty.json")).unwrap(), b"");
}

#[tokio::test]
async fn transport_failure_stops_before_storage() {
    let sink = BrokenSink::default();

    let err = pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &StatusFetcher(503), sink: &sink }, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 503, .. }));
    assert!(err.is_transport());
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn page_without_marker_stops_before_storage() {
    let sink = BrokenSink::default();
    let fetcher = StubFetcher::new(store_page(&["window.analytics = {};"]));

    let err = pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &sink }, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ExtractionNotFound { .. }));
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_payload_stops_before_storage() {
    let sink = BrokenSink::default();
    let fetcher = StubFetcher::new(store_page(&["REFURB_GRID_BOOTSTRAP = {tiles: nope};"]));

    let err = pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &sink }, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("'{tiles: no'"));
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sink_failure_is_surfaced() {
    let sink = BrokenSink::default();
    let fetcher = StubFetcher::new(store_page(&[&format!("REFURB_GRID_BOOTSTRAP = {GRID};")]));

    let err = pipeline()
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &sink }, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Sink(ref msg) if msg == "bucket does not exist"));
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stalled_write_times_out() {
    let pipeline = Pipeline::new(OfferExtractor::default(), "dump", Duration::from_millis(50));
    let fetcher = StubFetcher::new(store_page(&[&format!("REFURB_GRID_BOOTSTRAP = {GRID};")]));

    let err = pipeline
        .run(Source::RemotePage { url: "https://store.test", fetcher: &fetcher, sink: &StalledSink }, Some("slow.json"))
        .await
        .unwrap_err();

    match err {
        Error::Sink(msg) => assert!(msg.contains("timed out"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn raw_fragment_has_no_storage_side_effect() {
    let output = pipeline()
        .run(Source::RawFragment { json: GRID }, Some("ignored.json"))
        .await
        .unwrap();

    let RunOutput::Ndjson(text) = output else {
        panic!("expected inline ndjson");
    };
    let parts: Vec<String> = text
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["partNumber"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(parts, ["FKGP3SM/A", "FKGQ3SM/A"]);
}
