#![allow(dead_code)]

use std::sync::Once;

use lottrace_core::{update, AppState, Effect, Generation, JobId, Msg, SelectedFile, UploadReceipt};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

pub fn file(name: &str, size_bytes: u64) -> SelectedFile {
    SelectedFile::new(name, size_bytes, format!("/data/{name}"))
}

pub fn with_files(state: AppState, files: Vec<SelectedFile>) -> AppState {
    let (state, _) = update(state, Msg::FilesSelected(files));
    state
}

pub fn generation_of(effects: &[Effect]) -> Generation {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Upload { generation, .. }
            | Effect::Search { generation, .. }
            | Effect::FetchDownload { generation, .. }
            | Effect::InspectJob { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("request effect")
}

pub fn receipt(job_id: &str, download: &str) -> UploadReceipt {
    UploadReceipt {
        job_id: JobId::new(job_id),
        download: download.to_string(),
        files_processed: vec!["raw_data.xlsx".to_string()],
    }
}

/// Runs a successful upload so the session holds `job_id`.
pub fn uploaded(job_id: &str) -> AppState {
    let state = with_files(AppState::new(), vec![file("raw_data.xlsx", 2048)]);
    let (state, effects) = update(state, Msg::UploadClicked);
    let generation = generation_of(&effects);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            generation,
            result: Ok(receipt(job_id, &format!("/download/{job_id}/final_data.csv"))),
        },
    );
    state
}
