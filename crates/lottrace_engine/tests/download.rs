use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use bytes::Bytes;
use lottrace_engine::{save_blob, BlobDownloader, DirectoryDownloader, ObjectUrl, PersistError};
use tempfile::TempDir;

/// Records every call so the acquire/use/release order can be checked.
#[derive(Default)]
struct RecordingDownloader {
    calls: Mutex<Vec<String>>,
    fail_download: bool,
    inner: Option<DirectoryDownloader>,
}

impl RecordingDownloader {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BlobDownloader for RecordingDownloader {
    fn create_object_url(&self, blob: Bytes) -> ObjectUrl {
        let inner = self.inner.as_ref().expect("inner downloader");
        let url = inner.create_object_url(blob);
        self.calls.lock().unwrap().push(format!("create {url}"));
        url
    }

    fn trigger_download(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf, PersistError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("download {url} as {filename}"));
        if self.fail_download {
            return Err(PersistError::InvalidName(filename.to_string()));
        }
        self.inner
            .as_ref()
            .expect("inner downloader")
            .trigger_download(url, filename)
    }

    fn revoke_object_url(&self, url: ObjectUrl) {
        self.calls.lock().unwrap().push(format!("revoke {url}"));
        self.inner
            .as_ref()
            .expect("inner downloader")
            .revoke_object_url(url);
    }
}

#[test]
fn export_is_saved_under_given_name_and_url_revoked_once() {
    let temp = TempDir::new().unwrap();
    let downloader = RecordingDownloader {
        inner: Some(DirectoryDownloader::new(temp.path().to_path_buf())),
        ..RecordingDownloader::default()
    };

    let path = save_blob(
        &downloader,
        Bytes::from_static(b"LOT A\n4711\n"),
        "lot_trace_result.csv",
    )
    .unwrap();

    assert_eq!(path, temp.path().join("lot_trace_result.csv"));
    assert_eq!(fs::read(&path).unwrap(), b"LOT A\n4711\n");
    assert_eq!(
        downloader.calls(),
        vec![
            "create blob:lottrace/1".to_string(),
            "download blob:lottrace/1 as lot_trace_result.csv".to_string(),
            "revoke blob:lottrace/1".to_string(),
        ]
    );
    assert_eq!(downloader.inner.as_ref().unwrap().live_urls(), 0);
}

#[test]
fn url_is_revoked_even_when_download_fails() {
    let temp = TempDir::new().unwrap();
    let downloader = RecordingDownloader {
        inner: Some(DirectoryDownloader::new(temp.path().to_path_buf())),
        fail_download: true,
        ..RecordingDownloader::default()
    };

    let result = save_blob(&downloader, Bytes::from_static(b"x"), "lot_trace_result.csv");

    assert!(result.is_err());
    let revokes = downloader
        .calls()
        .iter()
        .filter(|call| call.starts_with("revoke"))
        .count();
    assert_eq!(revokes, 1);
    assert_eq!(downloader.inner.as_ref().unwrap().live_urls(), 0);
}

#[test]
fn revoked_url_can_no_longer_be_downloaded() {
    let temp = TempDir::new().unwrap();
    let downloader = DirectoryDownloader::new(temp.path().to_path_buf());

    let url = downloader.create_object_url(Bytes::from_static(b"x"));
    let name = url.as_str().to_string();
    downloader.revoke_object_url(url);

    let stale = downloader.create_object_url(Bytes::from_static(b"y"));
    assert_ne!(stale.as_str(), name);
    assert_eq!(downloader.live_urls(), 1);
    downloader.revoke_object_url(stale);
    assert_eq!(downloader.live_urls(), 0);
}
