use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use serde::Deserialize;

/// Stamp the caller attaches to a command; echoed back on its completion event.
pub type RequestId = u64;

/// One local file to submit as a `files` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub job_id: String,
    pub download: String,
    #[serde(default)]
    pub files_processed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotQuery {
    pub job_id: String,
    pub lot_a: String,
    pub lot_b: String,
}

/// Body of `/debug/<job_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JobSummary {
    pub total_rows: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub lot_a_sample: Vec<String>,
    #[serde(default)]
    pub lot_a_count: Option<u64>,
    #[serde(default)]
    pub lot_b_sample: Vec<String>,
    #[serde(default)]
    pub lot_b_count: Option<u64>,
}

/// Error payload the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    /// Pipeline stderr excerpt sent with a failed `/upload`.
    #[serde(default)]
    pub details: Option<String>,
    /// Available lot values sent with an empty `/search`.
    #[serde(default)]
    pub debug: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        request_id: RequestId,
        result: Result<UploadReceipt, BackendError>,
    },
    SearchCompleted {
        request_id: RequestId,
        result: Result<Bytes, BackendError>,
    },
    DownloadCompleted {
        request_id: RequestId,
        result: Result<PathBuf, BackendError>,
    },
    InspectCompleted {
        request_id: RequestId,
        result: Result<JobSummary, BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
    /// Diagnostics the backend attached next to `error`, if any.
    pub detail: Option<String>,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Backend answered with a non-success status.
    Rejected(u16),
    Timeout,
    Network,
    /// Success response whose body could not be understood.
    Decode,
    /// A local file could not be read or written.
    LocalFile,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Rejected(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::LocalFile => write!(f, "local file error"),
        }
    }
}
