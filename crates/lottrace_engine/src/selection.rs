use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// A local file the user picked, with what the file list needs to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cannot read {path}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
}

/// Stats each path. Fails on the first path that is missing or not a regular file.
pub fn describe_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<LocalFile>, SelectionError> {
    paths
        .iter()
        .map(|path| describe_file(path.as_ref()))
        .collect()
}

fn describe_file(path: &Path) -> Result<LocalFile, SelectionError> {
    let meta = fs::metadata(path).map_err(|source| SelectionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(SelectionError::NotAFile(path.to_path_buf()));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LocalFile {
        name,
        size_bytes: meta.len(),
        path: path.to_path_buf(),
    })
}

/// Splits text a terminal pastes when files are dropped onto it into paths.
///
/// Handles whitespace/newline separated entries, single or double quoting,
/// backslash-escaped spaces and `file://` URIs.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    split_tokens(text)
        .into_iter()
        .map(|token| token_to_path(&token))
        .collect()
}

fn token_to_path(token: &str) -> PathBuf {
    if token.starts_with("file://") {
        if let Some(path) = Url::parse(token).ok().and_then(|url| url.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(token)
}

fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(ch),
            // Only an escape when it protects a space, quote or backslash; otherwise
            // it is a Windows path separator.
            (None, '\\') => match chars.peek() {
                Some(&next) if matches!(next, ' ' | '\'' | '"' | '\\') => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::parse_dropped_paths;
    use std::path::PathBuf;

    #[test]
    fn splits_plain_paths_on_whitespace() {
        assert_eq!(
            parse_dropped_paths("/data/a.csv /data/b.xlsx\n/data/c.csv\n"),
            vec![
                PathBuf::from("/data/a.csv"),
                PathBuf::from("/data/b.xlsx"),
                PathBuf::from("/data/c.csv"),
            ]
        );
    }

    #[test]
    fn keeps_quoted_and_escaped_spaces() {
        assert_eq!(
            parse_dropped_paths("'/data/raw data.xlsx' /data/CL\\ Cleaner.csv \"/x/y z.csv\""),
            vec![
                PathBuf::from("/data/raw data.xlsx"),
                PathBuf::from("/data/CL Cleaner.csv"),
                PathBuf::from("/x/y z.csv"),
            ]
        );
    }

    #[test]
    fn windows_separators_survive() {
        assert_eq!(
            parse_dropped_paths("C:\\data\\a.csv"),
            vec![PathBuf::from("C:\\data\\a.csv")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn file_uris_become_paths() {
        assert_eq!(
            parse_dropped_paths("file:///tmp/raw%20data.xlsx\r\nfile:///tmp/b.csv"),
            vec![
                PathBuf::from("/tmp/raw data.xlsx"),
                PathBuf::from("/tmp/b.csv"),
            ]
        );
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_dropped_paths("  \n\t ").is_empty());
    }
}
