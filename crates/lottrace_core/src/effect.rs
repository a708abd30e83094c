use std::time::Duration;

use crate::{JobId, SearchRequest, SelectedFile};

/// Monotonic stamp identifying one request-issuing action.
pub type Generation = u64;
/// Identifies one shown status panel.
pub type StatusId = u64;

/// Success and error panels hide themselves after this long.
pub const STATUS_AUTO_DISMISS: Duration = Duration::from_millis(5000);
/// Name of the file saved from a lot search.
pub const EXPORT_FILENAME: &str = "lot_trace_result.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The triggering input must not fall through to its platform default.
    PreventDefault,
    OpenFilePicker,
    Upload {
        generation: Generation,
        files: Vec<SelectedFile>,
    },
    Search {
        generation: Generation,
        request: SearchRequest,
    },
    FetchDownload {
        generation: Generation,
        href: String,
    },
    InspectJob {
        generation: Generation,
        job_id: JobId,
    },
    SaveExport {
        filename: String,
        bytes: Vec<u8>,
    },
    ScheduleStatusDismiss {
        status_id: StatusId,
        after: Duration,
    },
}
