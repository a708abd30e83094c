use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use bytes::Bytes;
use dashboard_logging::{dash_info, dash_warn};
use lottrace_core::{Effect, Msg};
use lottrace_engine::{
    ensure_download_dir, save_blob, BackendSettings, DirectoryDownloader, EngineHandle,
    ReqwestBackend,
};

use super::mapping;
use crate::config::AppConfig;

/// What the surface itself must do after a batch of effects ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EffectOutcome {
    pub prevent_default: bool,
    pub open_picker: bool,
}

pub struct EffectRunner {
    engine: EngineHandle,
    downloader: DirectoryDownloader,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self> {
        ensure_download_dir(&config.download_dir)?;

        let mut settings = BackendSettings::new(config.server.clone());
        settings.connect_timeout = config.connect_timeout;
        settings.request_timeout = config.request_timeout;
        let backend = ReqwestBackend::new(settings).context("failed to build http client")?;

        let engine = EngineHandle::new(Arc::new(backend), config.download_dir.clone())
            .context("failed to start engine")?;
        dash_info!(
            "Engine ready server={} download_dir={}",
            config.server,
            config.download_dir.display()
        );

        Ok(Self {
            engine,
            downloader: DirectoryDownloader::new(config.download_dir.clone()),
            msg_tx,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();
        for effect in effects {
            match effect {
                Effect::PreventDefault => outcome.prevent_default = true,
                Effect::OpenFilePicker => outcome.open_picker = true,
                Effect::Upload { generation, files } => {
                    dash_info!("Upload generation={} files={}", generation, files.len());
                    let files = files.iter().map(mapping::upload_file).collect();
                    self.engine.upload(generation, files);
                }
                Effect::Search {
                    generation,
                    request,
                } => {
                    dash_info!(
                        "Search generation={} job_id={} lot_a={:?} lot_b={:?}",
                        generation,
                        request.job_id,
                        request.lot_a,
                        request.lot_b
                    );
                    self.engine.search(generation, mapping::lot_query(request));
                }
                Effect::FetchDownload { generation, href } => {
                    dash_info!("Download generation={} href={}", generation, href);
                    self.engine.download(generation, href);
                }
                Effect::InspectJob { generation, job_id } => {
                    dash_info!("Inspect generation={} job_id={}", generation, job_id);
                    self.engine.inspect(generation, job_id.as_str());
                }
                Effect::SaveExport { filename, bytes } => self.save_export(&filename, bytes),
                Effect::ScheduleStatusDismiss { status_id, after } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = msg_tx.send(Msg::StatusDismissDue { status_id });
                    });
                }
            }
        }
        outcome
    }

    /// Drains finished engine requests as core messages.
    pub fn poll_engine(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(mapping::event_to_msg)
            .collect()
    }

    fn save_export(&self, filename: &str, bytes: Vec<u8>) {
        let msg = match save_blob(&self.downloader, Bytes::from(bytes), filename) {
            Ok(path) => {
                dash_info!("Export saved to {}", path.display());
                Msg::ExportSaved { path }
            }
            Err(err) => {
                dash_warn!("Export {} failed: {}", filename, err);
                Msg::ExportFailed(err.to_string())
            }
        };
        let _ = self.msg_tx.send(msg);
    }
}
