//! Lot trace core: pure dashboard state machine and view-model helpers.
mod effect;
mod msg;
mod report;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Generation, StatusId, EXPORT_FILENAME, STATUS_AUTO_DISMISS};
pub use msg::{ClickTarget, Key, Msg};
pub use report::{ActionFailure, JobId, JobSummary, SearchRequest, UploadReceipt};
pub use selection::{format_mib, FileIcon, SelectedFile};
pub use state::{ActionKind, AppState, InFlight, StatusKind};
pub use update::update;
pub use view_model::{AppViewModel, FileRowView, ResultPanelView, StatusView};
