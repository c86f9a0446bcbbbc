use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file the pipeline needs before it can run, e.g. weights or a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResource {
    /// Identifier shown in progress notifications.
    pub file: String,
    pub url: String,
}

impl ModelResource {
    pub fn new(file: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            url: url.into(),
        }
    }
}

/// A resource available on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResource {
    pub file: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Cache,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "resource too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Cache => write!(f, "cache error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Anything that stops a task; surfaced to the UI as an `error` notification.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load {file}: {source}")]
    Resource {
        file: String,
        #[source]
        source: FetchError,
    },
    #[error("resource {0} was not loaded")]
    MissingResource(String),
    #[error("invalid model data in {file}: {message}")]
    InvalidModel { file: String, message: String },
    #[error("no translation from {src_lang} to {tgt_lang} for {text:?}")]
    Untranslatable {
        text: String,
        src_lang: String,
        tgt_lang: String,
    },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("worker runtime unavailable: {0}")]
    Runtime(String),
}
