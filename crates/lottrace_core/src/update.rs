use crate::{
    ActionKind, AppState, ClickTarget, Effect, Key, Msg, SearchRequest, StatusKind,
    EXPORT_FILENAME,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => {
            // The file input is disabled while a request runs.
            if !state.is_busy() {
                state.select_files(files);
            }
            Vec::new()
        }
        Msg::DropZoneClicked => {
            // The file input is disabled along with every other control.
            if state.is_busy() {
                Vec::new()
            } else {
                vec![Effect::OpenFilePicker]
            }
        }
        Msg::DragOver => {
            state.set_drag_active(true);
            vec![Effect::PreventDefault]
        }
        Msg::DragLeave => {
            state.set_drag_active(false);
            vec![Effect::PreventDefault]
        }
        Msg::Dropped(files) => {
            state.set_drag_active(false);
            if !state.is_busy() {
                state.select_files(files);
            }
            vec![Effect::PreventDefault]
        }
        Msg::UploadClicked => start_upload(&mut state),
        Msg::UploadFinished { generation, result } => {
            if !state.finish_action(generation, ActionKind::Upload) {
                return (state, Vec::new());
            }
            match result {
                Ok(receipt) => {
                    state.apply_upload_receipt(receipt);
                    state.set_header("Pipeline completed");
                    state.show_status(StatusKind::Success, "Pipeline completed successfully!")
                }
                Err(failure) => {
                    state.set_header("Pipeline failed");
                    state.show_status(StatusKind::Error, format!("Error: {failure}"))
                }
            }
        }
        Msg::LotAChanged(value) => {
            if !state.is_busy() {
                state.set_lot_a(value);
            }
            Vec::new()
        }
        Msg::LotBChanged(value) => {
            if !state.is_busy() {
                state.set_lot_b(value);
            }
            Vec::new()
        }
        Msg::SearchClicked => start_search(&mut state),
        Msg::SearchFinished { generation, result } => {
            if !state.finish_action(generation, ActionKind::Search) {
                return (state, Vec::new());
            }
            match result {
                Ok(bytes) => {
                    let mut effects = vec![Effect::SaveExport {
                        filename: EXPORT_FILENAME.to_string(),
                        bytes,
                    }];
                    state.set_header("Export completed");
                    effects.extend(
                        state.show_status(StatusKind::Success, "LOT trace exported successfully!"),
                    );
                    effects
                }
                Err(failure) => {
                    state.set_header("Search failed");
                    state.show_status(StatusKind::Error, format!("Search Error: {failure}"))
                }
            }
        }
        Msg::ExportSaved { path } => {
            state.set_last_export(path);
            Vec::new()
        }
        Msg::ExportFailed(message) => {
            state.show_status(StatusKind::Error, format!("Export Error: {message}"))
        }
        Msg::DownloadLinkActivated => start_download(&mut state),
        Msg::DownloadFinished { generation, result } => {
            if !state.finish_action(generation, ActionKind::Download) {
                return (state, Vec::new());
            }
            match result {
                Ok(path) => {
                    state.show_status(StatusKind::Success, format!("Saved {}", path.display()))
                }
                Err(failure) => {
                    state.show_status(StatusKind::Error, format!("Download Error: {failure}"))
                }
            }
        }
        Msg::InspectClicked => start_inspect(&mut state),
        Msg::InspectFinished { generation, result } => {
            if !state.finish_action(generation, ActionKind::Inspect) {
                return (state, Vec::new());
            }
            match result {
                Ok(summary) => {
                    state.set_summary(summary);
                    state.show_status(StatusKind::Success, "Job summary loaded")
                }
                Err(failure) => {
                    state.show_status(StatusKind::Error, format!("Inspect Error: {failure}"))
                }
            }
        }
        Msg::StatusDismissDue { status_id } => {
            state.dismiss_status(status_id);
            Vec::new()
        }
        Msg::HelpToggleClicked => {
            let open = state.help_open();
            state.set_help_open(!open);
            Vec::new()
        }
        Msg::Clicked(target) => {
            if target == ClickTarget::Elsewhere {
                state.set_help_open(false);
            }
            Vec::new()
        }
        Msg::KeyPressed(Key::Escape) => {
            state.set_help_open(false);
            Vec::new()
        }
        Msg::KeyPressed(Key::F1) => {
            state.set_help_open(true);
            vec![Effect::PreventDefault]
        }
        Msg::KeyPressed(Key::Other) | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_upload(state: &mut AppState) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }
    if state.selected_files().is_empty() {
        return state.show_status(StatusKind::Error, "Please select files first.");
    }

    let files = state.selected_files().to_vec();
    let generation = state.begin_action(ActionKind::Upload);
    state.set_header("Processing pipeline...");
    let mut effects = state.show_status(
        StatusKind::Loading,
        "Uploading files and running pipeline...",
    );
    effects.push(Effect::Upload { generation, files });
    effects
}

fn start_search(state: &mut AppState) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }
    let Some(job_id) = state.job_id().cloned() else {
        return state.show_status(StatusKind::Error, "Please run the pipeline first.");
    };
    let (lot_a, lot_b) = state.trimmed_lots();
    if lot_a.is_empty() && lot_b.is_empty() {
        return state.show_status(
            StatusKind::Error,
            "Please enter at least one LOT (A or B) to search.",
        );
    }

    let generation = state.begin_action(ActionKind::Search);
    state.set_header("Searching LOT data...");
    let mut effects = state.show_status(StatusKind::Loading, "Searching LOT trace...");
    effects.push(Effect::Search {
        generation,
        request: SearchRequest {
            job_id,
            lot_a,
            lot_b,
        },
    });
    effects
}

fn start_download(state: &mut AppState) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }
    let Some(href) = state.download_href().map(ToOwned::to_owned) else {
        return Vec::new();
    };

    let generation = state.begin_action(ActionKind::Download);
    let mut effects = state.show_status(StatusKind::Loading, "Downloading result file...");
    effects.push(Effect::FetchDownload { generation, href });
    effects
}

fn start_inspect(state: &mut AppState) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }
    let Some(job_id) = state.job_id().cloned() else {
        return state.show_status(StatusKind::Error, "Please run the pipeline first.");
    };

    let generation = state.begin_action(ActionKind::Inspect);
    let mut effects = state.show_status(StatusKind::Loading, "Loading job summary...");
    effects.push(Effect::InspectJob { generation, job_id });
    effects
}
