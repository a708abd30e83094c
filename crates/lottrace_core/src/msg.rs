use std::path::PathBuf;

use crate::{ActionFailure, Generation, JobSummary, SelectedFile, StatusId, UploadReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// File picker reported its current selection.
    FilesSelected(Vec<SelectedFile>),
    /// User clicked the drop zone; behaves like clicking the file input.
    DropZoneClicked,
    DragOver,
    DragLeave,
    /// Files were dropped onto the upload area.
    Dropped(Vec<SelectedFile>),
    UploadClicked,
    UploadFinished {
        generation: Generation,
        result: Result<UploadReceipt, ActionFailure>,
    },
    LotAChanged(String),
    LotBChanged(String),
    SearchClicked,
    /// Search response body, an opaque CSV blob on success.
    SearchFinished {
        generation: Generation,
        result: Result<Vec<u8>, ActionFailure>,
    },
    ExportSaved {
        path: PathBuf,
    },
    ExportFailed(String),
    /// User followed the download link of the success panel.
    DownloadLinkActivated,
    DownloadFinished {
        generation: Generation,
        result: Result<PathBuf, ActionFailure>,
    },
    InspectClicked,
    InspectFinished {
        generation: Generation,
        result: Result<JobSummary, ActionFailure>,
    },
    /// Auto-dismiss timer fired for a status panel.
    StatusDismissDue {
        status_id: StatusId,
    },
    HelpToggleClicked,
    Clicked(ClickTarget),
    KeyPressed(Key),
    NoOp,
}

/// Where a pointer click landed, relative to the help affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    HelpPanel,
    HelpToggle,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    F1,
    Other,
}
