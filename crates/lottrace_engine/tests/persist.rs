use std::fs;

use lottrace_engine::{ensure_download_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports");
    assert!(!new_dir.exists());
    ensure_download_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_export() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("lot_trace_result.csv", b"LOT A\n1\n").unwrap();
    assert_eq!(first.file_name().unwrap(), "lot_trace_result.csv");
    assert_eq!(fs::read(&first).unwrap(), b"LOT A\n1\n");

    let second = writer.write("lot_trace_result.csv", b"LOT A\n2\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"LOT A\n2\n");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("lot_trace_result.csv", b"data");
    assert!(matches!(result, Err(PersistError::DownloadDir(_))));
    assert!(!file_path.with_file_name("lot_trace_result.csv").exists());
}

#[test]
fn refuses_names_that_escape_the_directory() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("inner"));

    let result = writer.write("../escape.csv", b"data");

    assert!(matches!(result, Err(PersistError::InvalidName(_))));
    assert!(!temp.path().join("escape.csv").exists());
}
