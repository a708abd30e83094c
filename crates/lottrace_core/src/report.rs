use std::fmt;

/// Opaque pipeline run identifier handed out by the backend after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful `/upload` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub job_id: JobId,
    pub download: String,
    pub files_processed: Vec<String>,
}

/// Lot search scoped to one pipeline run. Lots are already trimmed and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub job_id: JobId,
    pub lot_a: String,
    pub lot_b: String,
}

/// Overview of a processed job as reported by the backend's debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub total_rows: u64,
    pub columns: Vec<String>,
    pub lot_a_sample: Vec<String>,
    pub lot_a_count: Option<u64>,
    pub lot_b_sample: Vec<String>,
    pub lot_b_count: Option<u64>,
}

/// Why a backend action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    /// Non-2xx response; `message` is the body's `error` field or a fallback.
    Rejected { status: u16, message: String },
    Network(String),
    LocalFile(String),
    Decode(String),
}

impl ActionFailure {
    pub fn message(&self) -> &str {
        match self {
            ActionFailure::Rejected { message, .. } => message,
            ActionFailure::Network(message)
            | ActionFailure::LocalFile(message)
            | ActionFailure::Decode(message) => message,
        }
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
