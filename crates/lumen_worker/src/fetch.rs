use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use lumen_core::Notification;
use lumen_logging::{lumen_debug, lumen_info};
use url::{ParseError, Url};

use crate::filename::cache_filename;
use crate::persist::AtomicFileWriter;
use crate::sink::NotificationSink;
use crate::{FailureKind, FetchError, LoadedResource, ModelResource};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            max_bytes: 1024 * 1024 * 1024,
        }
    }
}

/// Makes a model resource available locally, reporting
/// `initiate`, `progress` and `done` for it through `sink`.
#[async_trait::async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(
        &self,
        resource: &ModelResource,
        sink: &dyn NotificationSink,
    ) -> Result<LoadedResource, FetchError>;
}

/// Downloads resources over HTTP, or copies local files, into a cache directory.
///
/// Cached files are served without a request but still produce the
/// `initiate`/`progress`/`done` triple, so the UI sees one shape either way.
#[derive(Debug, Clone)]
pub struct ReqwestResourceFetcher {
    settings: FetchSettings,
    cache: AtomicFileWriter,
}

impl ReqwestResourceFetcher {
    pub fn new(settings: FetchSettings, cache_dir: PathBuf) -> Self {
        Self {
            settings,
            cache: AtomicFileWriter::new(cache_dir),
        }
    }

    pub fn cache_path(&self, resource: &ModelResource) -> PathBuf {
        self.cache
            .dir()
            .join(cache_filename(&resource.file, &resource.url))
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn load(
        &self,
        resource: &ModelResource,
        sink: &dyn NotificationSink,
    ) -> Result<PathBuf, FetchError> {
        match locate(&resource.url)? {
            Location::Remote(url) => self.download(resource, url, sink).await,
            Location::Local(path) => self.copy_local(resource, &path, sink),
        }
    }

    fn copy_local(
        &self,
        resource: &ModelResource,
        path: &Path,
        sink: &dyn NotificationSink,
    ) -> Result<PathBuf, FetchError> {
        let io_error =
            |err: std::io::Error| FetchError::new(FailureKind::Io, format!("{}: {err}", path.display()));
        let size = fs::metadata(path).map_err(io_error)?.len();
        if size > self.settings.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(size),
                },
                "resource too large",
            ));
        }
        let bytes = fs::read(path).map_err(io_error)?;
        sink.emit(Notification::progress(resource.file.clone(), 100.0));
        self.store(resource, &bytes)
    }

    fn store(&self, resource: &ModelResource, bytes: &[u8]) -> Result<PathBuf, FetchError> {
        let filename = cache_filename(&resource.file, &resource.url);
        let path = self
            .cache
            .write(&filename, bytes)
            .map_err(|err| FetchError::new(FailureKind::Cache, err.to_string()))?;
        lumen_info!(
            "Cached {} ({} bytes) at {:?}",
            resource.file,
            bytes.len(),
            path
        );
        Ok(path)
    }

    async fn download(
        &self,
        resource: &ModelResource,
        url: Url,
        sink: &dyn NotificationSink,
    ) -> Result<PathBuf, FetchError> {
        let client = self.build_client()?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let total = response.content_length();
        if let Some(content_len) = total {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "resource too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "resource too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            if let Some(total) = total.filter(|total| *total > 0) {
                sink.emit(Notification::progress(
                    resource.file.clone(),
                    bytes.len() as f64 / total as f64 * 100.0,
                ));
            }
        }
        if total.is_none() {
            sink.emit(Notification::progress(resource.file.clone(), 100.0));
        }

        self.store(resource, &bytes)
    }
}

#[async_trait::async_trait]
impl ResourceFetcher for ReqwestResourceFetcher {
    async fn fetch(
        &self,
        resource: &ModelResource,
        sink: &dyn NotificationSink,
    ) -> Result<LoadedResource, FetchError> {
        sink.emit(Notification::initiate(resource.file.clone()));

        let cached = self.cache_path(resource);
        let result = if cached.is_file() {
            lumen_debug!("Cache hit for {} at {:?}", resource.file, cached);
            sink.emit(Notification::progress(resource.file.clone(), 100.0));
            Ok(cached)
        } else {
            self.load(resource, sink).await
        };

        // The load is over either way; a failed file must not linger as active.
        sink.emit(Notification::done(resource.file.clone()));

        result.map(|path| LoadedResource {
            file: resource.file.clone(),
            path,
        })
    }
}

enum Location {
    Remote(Url),
    Local(PathBuf),
}

/// `http(s)://` and `file://` URLs, or a plain filesystem path.
fn locate(raw: &str) -> Result<Location, FetchError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Location::Remote(url)),
        Ok(url) if url.scheme() == "file" => {
            url.to_file_path().map(Location::Local).map_err(|_| {
                FetchError::new(FailureKind::InvalidUrl, format!("not a local file url: {raw}"))
            })
        }
        // Single letters are Windows drive prefixes, not schemes.
        Ok(url) if url.scheme().len() > 1 => Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", url.scheme()),
        )),
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {
            Ok(Location::Local(PathBuf::from(raw)))
        }
        Err(err) => Err(FetchError::new(FailureKind::InvalidUrl, err.to_string())),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
