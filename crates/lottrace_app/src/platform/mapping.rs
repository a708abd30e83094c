//! Conversions between engine results and the core's message vocabulary.

use lottrace_core::{
    ActionFailure, JobId, JobSummary, Msg, SearchRequest, SelectedFile, UploadReceipt,
};
use lottrace_engine::{BackendError, EngineEvent, FailureKind, LocalFile, LotQuery, UploadFile};

pub fn failure(err: BackendError) -> ActionFailure {
    match err.kind {
        FailureKind::Rejected(status) => ActionFailure::Rejected {
            status,
            message: err.message,
        },
        FailureKind::Timeout | FailureKind::Network => ActionFailure::Network(err.message),
        FailureKind::Decode => ActionFailure::Decode(err.message),
        FailureKind::LocalFile => ActionFailure::LocalFile(err.message),
    }
}

pub fn receipt(receipt: lottrace_engine::UploadReceipt) -> UploadReceipt {
    UploadReceipt {
        job_id: JobId::new(receipt.job_id),
        download: receipt.download,
        files_processed: receipt.files_processed,
    }
}

pub fn summary(summary: lottrace_engine::JobSummary) -> JobSummary {
    JobSummary {
        total_rows: summary.total_rows,
        columns: summary.columns,
        lot_a_sample: summary.lot_a_sample,
        lot_a_count: summary.lot_a_count,
        lot_b_sample: summary.lot_b_sample,
        lot_b_count: summary.lot_b_count,
    }
}

pub fn selected_file(file: LocalFile) -> SelectedFile {
    SelectedFile::new(file.name, file.size_bytes, file.path)
}

pub fn upload_file(file: &SelectedFile) -> UploadFile {
    UploadFile {
        name: file.name.clone(),
        path: file.path.clone(),
    }
}

pub fn lot_query(request: SearchRequest) -> LotQuery {
    LotQuery {
        job_id: request.job_id.as_str().to_string(),
        lot_a: request.lot_a,
        lot_b: request.lot_b,
    }
}

/// Request ids are the generations the core stamped on the effect.
pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { request_id, result } => Msg::UploadFinished {
            generation: request_id,
            result: result.map(receipt).map_err(failure),
        },
        EngineEvent::SearchCompleted { request_id, result } => Msg::SearchFinished {
            generation: request_id,
            result: result.map(|bytes| bytes.to_vec()).map_err(failure),
        },
        EngineEvent::DownloadCompleted { request_id, result } => Msg::DownloadFinished {
            generation: request_id,
            result: result.map_err(failure),
        },
        EngineEvent::InspectCompleted { request_id, result } => Msg::InspectFinished {
            generation: request_id,
            result: result.map(summary).map_err(failure),
        },
    }
}
