use std::path::PathBuf;

use crate::effect::{Effect, Generation, StatusId, STATUS_AUTO_DISMISS};
use crate::view_model::{AppViewModel, FileRowView, ResultPanelView, StatusView};
use crate::{JobId, JobSummary, SelectedFile, UploadReceipt};

const IDLE_HEADER: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Upload,
    Search,
    Download,
    Inspect,
}

/// The single backend action whose response is allowed to reach the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub generation: Generation,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

impl StatusKind {
    fn auto_dismisses(self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusPanel {
    id: StatusId,
    kind: StatusKind,
    message: String,
    visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompletedRun {
    download_href: String,
    files_processed: Vec<String>,
}

/// Session state of one dashboard. Nothing here outlives the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    job_id: Option<JobId>,
    files: Vec<SelectedFile>,
    drag_active: bool,
    lot_a: String,
    lot_b: String,
    in_flight: Option<InFlight>,
    last_generation: Generation,
    status: Option<StatusPanel>,
    last_status_id: StatusId,
    header: String,
    completed: Option<CompletedRun>,
    summary: Option<JobSummary>,
    last_export: Option<PathBuf>,
    help_open: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            job_id: None,
            files: Vec::new(),
            drag_active: false,
            lot_a: String::new(),
            lot_b: String::new(),
            in_flight: None,
            last_generation: 0,
            status: None,
            last_status_id: 0,
            header: IDLE_HEADER.to_string(),
            completed: None,
            summary: None,
            last_export: None,
            help_open: false,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let controls_enabled = self.in_flight.is_none();
        let sections_revealed = self.completed.is_some();
        AppViewModel {
            header_status: self.header.clone(),
            drag_active: self.drag_active,
            file_list_visible: !self.files.is_empty(),
            file_rows: self
                .files
                .iter()
                .map(|file| FileRowView {
                    name: file.name.clone(),
                    size_label: file.size_label(),
                    icon: file.icon(),
                })
                .collect(),
            upload_enabled: controls_enabled && !self.files.is_empty(),
            controls_enabled,
            status: self
                .status
                .as_ref()
                .filter(|panel| panel.visible)
                .map(|panel| StatusView {
                    kind: panel.kind,
                    message: panel.message.clone(),
                }),
            results_visible: sections_revealed,
            search_visible: sections_revealed,
            search_placeholder_visible: !sections_revealed,
            result_panel: self.completed.as_ref().map(|run| ResultPanelView {
                download_href: run.download_href.clone(),
                files_processed: run.files_processed.clone(),
            }),
            job_summary: self.summary.clone(),
            job_id: self.job_id.clone(),
            lot_a: self.lot_a.clone(),
            lot_b: self.lot_b.clone(),
            last_export: self.last_export.clone(),
            help_open: self.help_open,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub(crate) fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.header = if files.is_empty() {
            IDLE_HEADER.to_string()
        } else {
            format!("{} files selected", files.len())
        };
        self.files = files;
        self.dirty = true;
    }

    pub(crate) fn set_drag_active(&mut self, active: bool) {
        if self.drag_active != active {
            self.drag_active = active;
            self.dirty = true;
        }
    }

    pub(crate) fn set_lot_a(&mut self, value: String) {
        self.lot_a = value;
        self.dirty = true;
    }

    pub(crate) fn set_lot_b(&mut self, value: String) {
        self.lot_b = value;
        self.dirty = true;
    }

    /// Both lots, trimmed.
    pub(crate) fn trimmed_lots(&self) -> (String, String) {
        (
            self.lot_a.trim().to_string(),
            self.lot_b.trim().to_string(),
        )
    }

    pub(crate) fn set_header(&mut self, text: impl Into<String>) {
        self.header = text.into();
        self.dirty = true;
    }

    pub(crate) fn begin_action(&mut self, kind: ActionKind) -> Generation {
        self.last_generation += 1;
        self.in_flight = Some(InFlight {
            generation: self.last_generation,
            kind,
        });
        self.dirty = true;
        self.last_generation
    }

    /// Releases the in-flight slot if `generation` owns it. Stale completions return false.
    pub(crate) fn finish_action(&mut self, generation: Generation, kind: ActionKind) -> bool {
        let expected = InFlight { generation, kind };
        if self.in_flight != Some(expected) {
            return false;
        }
        self.in_flight = None;
        self.dirty = true;
        true
    }

    pub(crate) fn show_status(
        &mut self,
        kind: StatusKind,
        message: impl Into<String>,
    ) -> Vec<Effect> {
        self.last_status_id += 1;
        let status_id = self.last_status_id;
        self.status = Some(StatusPanel {
            id: status_id,
            kind,
            message: message.into(),
            visible: true,
        });
        self.dirty = true;
        if kind.auto_dismisses() {
            vec![Effect::ScheduleStatusDismiss {
                status_id,
                after: STATUS_AUTO_DISMISS,
            }]
        } else {
            Vec::new()
        }
    }

    pub(crate) fn dismiss_status(&mut self, status_id: StatusId) {
        if let Some(panel) = self.status.as_mut() {
            if panel.id == status_id && panel.visible {
                panel.visible = false;
                self.dirty = true;
            }
        }
    }

    pub(crate) fn apply_upload_receipt(&mut self, receipt: UploadReceipt) {
        self.job_id = Some(receipt.job_id);
        self.completed = Some(CompletedRun {
            download_href: receipt.download,
            files_processed: receipt.files_processed,
        });
        self.summary = None;
        self.dirty = true;
    }

    pub(crate) fn download_href(&self) -> Option<&str> {
        self.completed
            .as_ref()
            .map(|run| run.download_href.as_str())
    }

    pub(crate) fn set_summary(&mut self, summary: JobSummary) {
        self.summary = Some(summary);
        self.dirty = true;
    }

    pub(crate) fn set_last_export(&mut self, path: PathBuf) {
        self.last_export = Some(path);
        self.dirty = true;
    }

    pub(crate) fn help_open(&self) -> bool {
        self.help_open
    }

    pub(crate) fn set_help_open(&mut self, open: bool) {
        if self.help_open != open {
            self.help_open = open;
            self.dirty = true;
        }
    }
}
