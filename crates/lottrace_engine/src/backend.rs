use std::time::Duration;

use bytes::Bytes;
use dashboard_logging::{dash_debug, dash_info, dash_warn};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::ErrorBody;
use crate::{BackendError, FailureKind, JobSummary, LotQuery, UploadFile, UploadReceipt};

const UPLOAD_FALLBACK: &str = "Pipeline failed";
const SEARCH_FALLBACK: &str = "Search failed";
const DOWNLOAD_FALLBACK: &str = "Download failed";
const INSPECT_FALLBACK: &str = "Debug failed";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Whole-request limit; `None` lets long pipeline runs finish.
    pub request_timeout: Option<Duration>,
}

impl BackendSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait DashboardBackend: Send + Sync {
    /// POST every file as a repeated `files` multipart part to `/upload`.
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadReceipt, BackendError>;

    /// POST `job_id`, `lot_a` and `lot_b` to `/search`; the body is the CSV export.
    async fn search(&self, query: &LotQuery) -> Result<Bytes, BackendError>;

    /// GET a link handed out by the backend, relative to its base URL.
    async fn download(&self, href: &str) -> Result<Bytes, BackendError>;

    /// GET `/debug/<job_id>`.
    async fn inspect(&self, job_id: &str) -> Result<JobSummary, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::Network, format!("invalid url {path}: {err}")))
    }
}

#[async_trait::async_trait]
impl DashboardBackend for ReqwestBackend {
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadReceipt, BackendError> {
        let mut form = Form::new();
        for file in files {
            let content = tokio::fs::read(&file.path).await.map_err(|err| {
                BackendError::new(
                    FailureKind::LocalFile,
                    format!("{}: {err}", file.path.display()),
                )
            })?;
            dash_debug!("Attaching {} ({} bytes)", file.name, content.len());
            form = form.part("files", Part::bytes(content).file_name(file.name.clone()));
        }

        let url = self.endpoint("/upload")?;
        dash_info!("POST {} with {} file(s)", url, files.len());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response, UPLOAD_FALLBACK).await?;
        decode_json(response).await
    }

    async fn search(&self, query: &LotQuery) -> Result<Bytes, BackendError> {
        let form = Form::new()
            .text("job_id", query.job_id.clone())
            .text("lot_a", query.lot_a.clone())
            .text("lot_b", query.lot_b.clone());

        let url = self.endpoint("/search")?;
        dash_info!(
            "POST {} job_id={} lot_a={:?} lot_b={:?}",
            url,
            query.job_id,
            query.lot_a,
            query.lot_b
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response, SEARCH_FALLBACK).await?;
        response.bytes().await.map_err(map_reqwest_error)
    }

    async fn download(&self, href: &str) -> Result<Bytes, BackendError> {
        let url = self.endpoint(href)?;
        dash_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response, DOWNLOAD_FALLBACK).await?;
        response.bytes().await.map_err(map_reqwest_error)
    }

    async fn inspect(&self, job_id: &str) -> Result<JobSummary, BackendError> {
        let url = self.endpoint(&format!("/debug/{job_id}"))?;
        dash_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response, INSPECT_FALLBACK).await?;
        decode_json(response).await
    }
}

/// Turns a non-2xx response into `Rejected`, preferring the body's `error` field.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let parsed = serde_json::from_slice::<ErrorBody>(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| fallback.to_string());
    let detail = parsed.as_ref().and_then(error_detail);
    if let Some(detail) = &detail {
        dash_warn!("Backend detail for {}: {}", status, detail);
    }
    Err(BackendError {
        kind: FailureKind::Rejected(status.as_u16()),
        message,
        detail,
    })
}

fn error_message(body: &ErrorBody) -> Option<String> {
    body.error.clone().filter(|message| !message.is_empty())
}

/// `details` wins over the `debug` list; both are optional.
fn error_detail(body: &ErrorBody) -> Option<String> {
    body.details
        .clone()
        .filter(|details| !details.trim().is_empty())
        .or_else(|| (!body.debug.is_empty()).then(|| body.debug.join(" | ")))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
