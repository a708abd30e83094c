use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_logging::{dash_info, dash_warn};

use crate::backend::DashboardBackend;
use crate::persist::AtomicFileWriter;
use crate::{BackendError, EngineEvent, FailureKind, LotQuery, RequestId, UploadFile};

const FALLBACK_DOWNLOAD_NAME: &str = "download.bin";

enum EngineCommand {
    Upload {
        request_id: RequestId,
        files: Vec<UploadFile>,
    },
    Search {
        request_id: RequestId,
        query: LotQuery,
    },
    Download {
        request_id: RequestId,
        href: String,
    },
    Inspect {
        request_id: RequestId,
        job_id: String,
    },
}

/// Runs backend requests on a background tokio runtime; completions come back as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn DashboardBackend>, download_dir: PathBuf) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let writer = AtomicFileWriter::new(download_dir);

        thread::Builder::new()
            .name("lottrace-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let writer = writer.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = handle_command(backend.as_ref(), &writer, command).await;
                        let _ = event_tx.send(event);
                    });
                }
                dash_info!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn upload(&self, request_id: RequestId, files: Vec<UploadFile>) {
        self.send(EngineCommand::Upload { request_id, files });
    }

    pub fn search(&self, request_id: RequestId, query: LotQuery) {
        self.send(EngineCommand::Search { request_id, query });
    }

    /// Fetches `href` and saves it in the download directory under the link's file name.
    pub fn download(&self, request_id: RequestId, href: impl Into<String>) {
        self.send(EngineCommand::Download {
            request_id,
            href: href.into(),
        });
    }

    pub fn inspect(&self, request_id: RequestId, job_id: impl Into<String>) {
        self.send(EngineCommand::Inspect {
            request_id,
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn DashboardBackend,
    writer: &AtomicFileWriter,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Upload { request_id, files } => EngineEvent::UploadCompleted {
            request_id,
            result: backend.upload(&files).await,
        },
        EngineCommand::Search { request_id, query } => EngineEvent::SearchCompleted {
            request_id,
            result: backend.search(&query).await,
        },
        EngineCommand::Download { request_id, href } => {
            let result = match backend.download(&href).await {
                Ok(bytes) => writer
                    .write(&file_name_from_href(&href), &bytes)
                    .map_err(|err| BackendError::new(FailureKind::LocalFile, err.to_string())),
                Err(err) => Err(err),
            };
            EngineEvent::DownloadCompleted { request_id, result }
        }
        EngineCommand::Inspect { request_id, job_id } => EngineEvent::InspectCompleted {
            request_id,
            result: backend.inspect(&job_id).await,
        },
    }
}

/// Last path segment of a link, ignoring any query or fragment.
pub fn file_name_from_href(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| FALLBACK_DOWNLOAD_NAME.to_string())
}
