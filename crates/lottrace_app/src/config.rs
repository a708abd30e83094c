//! Runtime configuration: optional RON file, overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::cli::Cli;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILE: &str = "./lottrace.log";

/// Shape of the RON config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: Option<String>,
    download_dir: Option<PathBuf>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: Url,
    pub download_dir: PathBuf,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub log_file: PathBuf,
    pub initial_files: Vec<PathBuf>,
}

impl AppConfig {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };

        let server_raw = cli
            .server
            .clone()
            .or(file.server)
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let server =
            Url::parse(&server_raw).with_context(|| format!("invalid server url {server_raw:?}"))?;
        if server.cannot_be_a_base() {
            anyhow::bail!("server url {server_raw:?} cannot be used as a base");
        }

        let download_dir = cli
            .download_dir
            .clone()
            .or(file.download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let connect_timeout = Duration::from_secs(
            cli.connect_timeout
                .or(file.connect_timeout_secs)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        );
        let request_timeout = cli
            .request_timeout
            .or(file.request_timeout_secs)
            .map(Duration::from_secs);
        let log_file = cli
            .log_file
            .clone()
            .or(file.log_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            server,
            download_dir,
            connect_timeout,
            request_timeout,
            log_file,
            initial_files: cli.files.clone(),
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file_or_flags() {
        let config = AppConfig::resolve(&Cli::default()).unwrap();

        assert_eq!(config.server.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.log_file, PathBuf::from("./lottrace.log"));
    }

    #[test]
    fn flags_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lottrace.ron");
        fs::write(
            &path,
            r#"(
                server: Some("http://pipeline.local:8080"),
                download_dir: Some("exports"),
                request_timeout_secs: Some(900),
            )"#,
        )
        .unwrap();
        let cli = Cli {
            config: Some(path),
            download_dir: Some(PathBuf::from("/tmp/out")),
            ..Cli::default()
        };

        let config = AppConfig::resolve(&cli).unwrap();

        assert_eq!(config.server.as_str(), "http://pipeline.local:8080/");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(900)));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(server: ").unwrap();
        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };

        let err = AppConfig::resolve(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn rejects_unusable_server_url() {
        let cli = Cli {
            server: Some("mailto:ops@example.com".to_string()),
            ..Cli::default()
        };

        assert!(AppConfig::resolve(&cli).is_err());
    }
}
