use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use dashboard_logging::{dash_debug, dash_warn};

use crate::persist::{AtomicFileWriter, PersistError};

/// Temporary handle to an in-memory blob. Not `Clone`: it is revoked by value, once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait BlobDownloader: Send + Sync {
    fn create_object_url(&self, blob: Bytes) -> ObjectUrl;
    fn trigger_download(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf, PersistError>;
    fn revoke_object_url(&self, url: ObjectUrl);
}

/// Saves `blob` as `filename`: acquire an object URL, use it once, revoke it whatever happened.
pub fn save_blob(
    downloader: &dyn BlobDownloader,
    blob: Bytes,
    filename: &str,
) -> Result<PathBuf, PersistError> {
    let url = downloader.create_object_url(blob);
    let result = downloader.trigger_download(&url, filename);
    downloader.revoke_object_url(url);
    result
}

/// Serves object URLs from memory and "downloads" them into a directory.
#[derive(Debug)]
pub struct DirectoryDownloader {
    writer: AtomicFileWriter,
    blobs: Mutex<HashMap<u64, Bytes>>,
    next_id: AtomicU64,
}

impl DirectoryDownloader {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            blobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of object URLs created and not yet revoked.
    pub fn live_urls(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    fn blob_id(url: &ObjectUrl) -> Option<u64> {
        url.0.strip_prefix("blob:lottrace/")?.parse().ok()
    }
}

impl BlobDownloader for DirectoryDownloader {
    fn create_object_url(&self, blob: Bytes) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(id, blob);
        }
        let url = ObjectUrl(format!("blob:lottrace/{id}"));
        dash_debug!("Created {}", url);
        url
    }

    fn trigger_download(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf, PersistError> {
        let blob = Self::blob_id(url)
            .and_then(|id| self.blobs.lock().ok()?.get(&id).cloned())
            .ok_or_else(|| {
                PersistError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{url} is not a live object url"),
                ))
            })?;
        self.writer.write(filename, &blob)
    }

    fn revoke_object_url(&self, url: ObjectUrl) {
        let removed = Self::blob_id(&url)
            .and_then(|id| self.blobs.lock().ok()?.remove(&id))
            .is_some();
        if removed {
            dash_debug!("Revoked {}", url);
        } else {
            dash_warn!("Revoke of unknown {}", url);
        }
    }
}
