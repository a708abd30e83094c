use std::path::PathBuf;

use crate::{FileIcon, JobId, JobSummary, StatusKind};

/// Everything a surface needs to draw the dashboard; one field per named element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub header_status: String,
    pub drag_active: bool,
    pub file_list_visible: bool,
    pub file_rows: Vec<FileRowView>,
    pub upload_enabled: bool,
    pub controls_enabled: bool,
    pub status: Option<StatusView>,
    pub results_visible: bool,
    pub search_visible: bool,
    pub search_placeholder_visible: bool,
    pub result_panel: Option<ResultPanelView>,
    pub job_summary: Option<JobSummary>,
    pub job_id: Option<JobId>,
    pub lot_a: String,
    pub lot_b: String,
    pub last_export: Option<PathBuf>,
    pub help_open: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub size_label: String,
    pub icon: FileIcon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub kind: StatusKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanelView {
    pub download_href: String,
    pub files_processed: Vec<String>,
}
