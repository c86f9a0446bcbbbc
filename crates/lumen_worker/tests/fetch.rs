use std::sync::{Arc, Mutex};
use std::time::Duration;

use lumen_core::Notification;
use lumen_worker::{
    FailureKind, FetchSettings, ModelResource, NotificationSink, ReqwestResourceFetcher,
    ResourceFetcher,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<Notification> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl NotificationSink for TestSink {
    fn emit(&self, notification: Notification) {
        self.events.lock().unwrap().push(notification);
    }
}

#[tokio::test]
async fn fetcher_downloads_and_reports_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tokenizer.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"vocab\":{}}"))
        .mount(&server)
        .await;

    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let sink = TestSink::new();
    let resource = ModelResource::new(
        "tokenizer.json",
        format!("{}/tokenizer.json", server.uri()),
    );

    let loaded = fetcher.fetch(&resource, &sink).await.expect("fetch ok");
    assert_eq!(loaded.file, "tokenizer.json");
    assert_eq!(
        std::fs::read_to_string(&loaded.path).unwrap(),
        "{\"vocab\":{}}"
    );

    let events = sink.take();
    assert_eq!(events.first(), Some(&Notification::initiate("tokenizer.json")));
    assert_eq!(events.last(), Some(&Notification::done("tokenizer.json")));
    let last_progress = events
        .iter()
        .filter_map(|event| match event {
            Notification::Progress { progress, .. } => Some(*progress),
            _ => None,
        })
        .last()
        .expect("at least one progress event");
    assert_eq!(last_progress, 100.0);
}

#[tokio::test]
async fn cached_resource_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("weights"))
        .expect(1)
        .mount(&server)
        .await;

    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let resource = ModelResource::new("model.bin", format!("{}/model.bin", server.uri()));

    let first = TestSink::new();
    fetcher.fetch(&resource, &first).await.expect("first fetch");

    let second = TestSink::new();
    let loaded = fetcher.fetch(&resource, &second).await.expect("cached fetch");
    assert_eq!(loaded.path, fetcher.cache_path(&resource));
    assert_eq!(
        second.take(),
        vec![
            Notification::initiate("model.bin"),
            Notification::progress("model.bin", 100.0),
            Notification::done("model.bin"),
        ]
    );
}

#[tokio::test]
async fn http_failure_still_reports_done() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let sink = TestSink::new();
    let resource = ModelResource::new("missing", format!("{}/missing", server.uri()));

    let err = fetcher.fetch(&resource, &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(
        sink.take(),
        vec![Notification::initiate("missing"), Notification::done("missing")]
    );
    assert!(!fetcher.cache_path(&resource).exists());
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(settings, cache.path().to_path_buf());
    let resource = ModelResource::new("slow", format!("{}/slow", server.uri()));

    let err = fetcher.fetch(&resource, &TestSink::new()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(settings, cache.path().to_path_buf());
    let resource = ModelResource::new("large", format!("{}/large", server.uri()));

    let err = fetcher.fetch(&resource, &TestSink::new()).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn unsupported_scheme_is_invalid_url() {
    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let resource = ModelResource::new("bad", "ftp://example.com/model.bin");

    let err = fetcher.fetch(&resource, &TestSink::new()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn local_path_is_copied_into_cache() {
    let models = TempDir::new().unwrap();
    let source = models.path().join("phrasebook.json");
    std::fs::write(&source, "[]").unwrap();

    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let resource = ModelResource::new("phrasebook.json", source.to_string_lossy());
    let sink = TestSink::new();

    let loaded = fetcher.fetch(&resource, &sink).await.expect("local copy");
    assert!(loaded.path.starts_with(cache.path()));
    assert_eq!(std::fs::read_to_string(&loaded.path).unwrap(), "[]");
    assert_eq!(
        sink.take(),
        vec![
            Notification::initiate("phrasebook.json"),
            Notification::progress("phrasebook.json", 100.0),
            Notification::done("phrasebook.json"),
        ]
    );
}

#[tokio::test]
async fn missing_local_path_is_io_failure() {
    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(FetchSettings::default(), cache.path().to_path_buf());
    let resource = ModelResource::new("gone", "models/does-not-exist.bin");

    let err = fetcher.fetch(&resource, &TestSink::new()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn oversized_local_file_is_rejected_before_copy() {
    let models = TempDir::new().unwrap();
    let source = models.path().join("weights.bin");
    std::fs::write(&source, vec![0u8; 64]).unwrap();

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let cache = TempDir::new().unwrap();
    let fetcher = ReqwestResourceFetcher::new(settings, cache.path().to_path_buf());
    let resource = ModelResource::new("weights.bin", source.to_string_lossy());
    let sink = TestSink::new();

    let err = fetcher.fetch(&resource, &sink).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
    assert!(!fetcher.cache_path(&resource).exists());
    assert_eq!(
        sink.take(),
        vec![Notification::initiate("weights.bin"), Notification::done("weights.bin")]
    );
}
