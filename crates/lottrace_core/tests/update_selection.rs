mod common;

use common::{file, init_logging, with_files};
use lottrace_core::{update, AppState, Effect, FileIcon, Msg};
use pretty_assertions::assert_eq;

#[test]
fn selecting_files_renders_one_row_per_file() {
    init_logging();
    let files = vec![
        file("raw_data.xlsx", 1_572_864),
        file("CL_Cleaner.csv", 10_000),
        file("tbl_etching_batch.csv", 3 * 1024 * 1024),
    ];

    let (mut state, effects) = update(AppState::new(), Msg::FilesSelected(files));
    let view = state.view();

    assert!(effects.is_empty());
    assert!(view.file_list_visible);
    assert!(view.upload_enabled);
    assert_eq!(view.header_status, "3 files selected");
    assert_eq!(view.file_rows.len(), 3);
    assert_eq!(view.file_rows[0].name, "raw_data.xlsx");
    assert_eq!(view.file_rows[0].size_label, "1.50 MB");
    assert_eq!(view.file_rows[0].icon, FileIcon::Spreadsheet);
    assert_eq!(view.file_rows[1].size_label, "0.01 MB");
    assert_eq!(view.file_rows[1].icon, FileIcon::Tabular);
    assert_eq!(view.file_rows[2].size_label, "3.00 MB");
    assert!(state.consume_dirty());
}

#[test]
fn empty_selection_hides_list_and_disables_upload() {
    init_logging();
    let state = with_files(AppState::new(), vec![file("a.csv", 1)]);

    let (state, _) = update(state, Msg::FilesSelected(Vec::new()));
    let view = state.view();

    assert!(!view.file_list_visible);
    assert!(!view.upload_enabled);
    assert!(view.file_rows.is_empty());
    assert_eq!(view.header_status, "Ready");
}

#[test]
fn fresh_dashboard_has_nothing_to_upload() {
    let view = AppState::new().view();

    assert!(!view.file_list_visible);
    assert!(!view.upload_enabled);
    assert!(view.controls_enabled);
    assert!(view.search_placeholder_visible);
    assert!(!view.search_visible);
    assert!(view.status.is_none());
}

#[test]
fn drag_over_and_leave_toggle_highlight_and_prevent_default() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DragOver);
    assert!(state.view().drag_active);
    assert_eq!(effects, vec![Effect::PreventDefault]);

    let (state, effects) = update(state, Msg::DragLeave);
    assert!(!state.view().drag_active);
    assert_eq!(effects, vec![Effect::PreventDefault]);
}

#[test]
fn drop_replaces_selection_and_clears_highlight() {
    init_logging();
    let state = with_files(AppState::new(), vec![file("old.csv", 1)]);
    let (state, _) = update(state, Msg::DragOver);

    let (state, effects) = update(
        state,
        Msg::Dropped(vec![file("CL_Developer.csv", 1), file("CL_Etcher4.csv", 1)]),
    );
    let view = state.view();

    assert_eq!(effects, vec![Effect::PreventDefault]);
    assert!(!view.drag_active);
    let names: Vec<_> = view.file_rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["CL_Developer.csv", "CL_Etcher4.csv"]);
    assert_eq!(view.header_status, "2 files selected");
}

#[test]
fn drop_zone_click_opens_picker_unless_busy() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DropZoneClicked);
    assert_eq!(effects, vec![Effect::OpenFilePicker]);

    let state = with_files(state, vec![file("a.csv", 1)]);
    let (state, _) = update(state, Msg::UploadClicked);
    let (_state, effects) = update(state, Msg::DropZoneClicked);
    assert!(effects.is_empty());
}

#[test]
fn selection_is_frozen_while_a_request_runs() {
    init_logging();
    let state = with_files(AppState::new(), vec![file("raw.xlsx", 1)]);
    let (state, _) = update(state, Msg::UploadClicked);
    let (state, _) = update(state, Msg::DragOver);

    let (state, effects) = update(state, Msg::Dropped(vec![file("late.csv", 1)]));
    assert_eq!(effects, vec![Effect::PreventDefault]);
    let (state, effects) = update(state, Msg::FilesSelected(Vec::new()));
    assert!(effects.is_empty());

    let view = state.view();
    assert!(!view.drag_active);
    assert_eq!(view.header_status, "Processing pipeline...");
    let names: Vec<_> = view.file_rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["raw.xlsx"]);
    assert!(state.is_busy());
}
