//! Lot trace engine: backend client, request worker and local file IO.
mod backend;
mod download;
mod engine;
mod persist;
mod selection;
mod types;

pub use backend::{BackendSettings, DashboardBackend, ReqwestBackend};
pub use download::{save_blob, BlobDownloader, DirectoryDownloader, ObjectUrl};
pub use engine::{file_name_from_href, EngineHandle};
pub use persist::{ensure_download_dir, AtomicFileWriter, PersistError};
pub use selection::{describe_files, parse_dropped_paths, LocalFile, SelectionError};
pub use types::{
    BackendError, EngineEvent, FailureKind, JobSummary, LotQuery, RequestId, UploadFile,
    UploadReceipt,
};
