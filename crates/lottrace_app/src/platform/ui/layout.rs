use lottrace_core::AppViewModel;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

const HEADER_HEIGHT: u16 = 3;
const DROP_ZONE_HEIGHT: u16 = 4;
const FILE_LIST_MAX_ROWS: u16 = 6;
const BUTTON_ROW_HEIGHT: u16 = 3;
const UPLOAD_BUTTON_WIDTH: u16 = 20;
const RESULTS_HEIGHT: u16 = 7;
const SEARCH_HEIGHT: u16 = 5;
const PLACEHOLDER_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 3;
const HELP_TOGGLE_WIDTH: u16 = 10;
const INSPECT_BUTTON_WIDTH: u16 = 16;
const SEARCH_BUTTON_WIDTH: u16 = 14;
const HELP_PANEL_SIZE: (u16, u16) = (64, 16);
const PICKER_SIZE: (u16, u16) = (76, 7);

/// Clickable element under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    HelpToggle,
    HelpPanel,
    DropZone,
    UploadButton,
    DownloadLink,
    InspectButton,
    LotA,
    LotB,
    SearchButton,
}

/// Screen geometry for one frame. Computed from the view so drawing and
/// hit-testing agree on where every element is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub help_toggle: Rect,
    pub drop_zone: Rect,
    pub file_list: Option<Rect>,
    pub upload_button: Rect,
    pub results: Option<Rect>,
    pub download_link: Option<Rect>,
    pub inspect_button: Option<Rect>,
    /// Search inputs or the "run the pipeline first" placeholder.
    pub search: Option<Rect>,
    pub lot_a: Option<Rect>,
    pub lot_b: Option<Rect>,
    pub search_button: Option<Rect>,
    pub status: Rect,
    pub help_panel: Option<Rect>,
}

impl DashboardLayout {
    pub fn compute(area: Rect, view: &AppViewModel) -> Self {
        let file_list_height = if view.file_list_visible {
            (view.file_rows.len() as u16).min(FILE_LIST_MAX_ROWS) + 2
        } else {
            0
        };
        let results_height = if view.results_visible { RESULTS_HEIGHT } else { 0 };
        let search_height = if view.search_visible {
            SEARCH_HEIGHT
        } else if view.search_placeholder_visible {
            PLACEHOLDER_HEIGHT
        } else {
            0
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(DROP_ZONE_HEIGHT),
                Constraint::Length(file_list_height),
                Constraint::Length(BUTTON_ROW_HEIGHT),
                Constraint::Length(results_height),
                Constraint::Length(search_height),
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        let header = rows[0];
        let header_inner = inner(header);
        let help_toggle = Rect {
            x: header_inner.right().saturating_sub(HELP_TOGGLE_WIDTH),
            width: HELP_TOGGLE_WIDTH.min(header_inner.width),
            ..header_inner
        };

        let button_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(UPLOAD_BUTTON_WIDTH), Constraint::Min(0)])
            .split(rows[3]);

        let (results, download_link, inspect_button) = if view.results_visible {
            let results = rows[4];
            let first_line = Rect {
                height: inner(results).height.min(1),
                ..inner(results)
            };
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(INSPECT_BUTTON_WIDTH)])
                .split(first_line);
            (Some(results), Some(split[0]), Some(split[1]))
        } else {
            (None, None, None)
        };

        let search = (search_height > 0).then_some(rows[5]);
        let (lot_a, lot_b, search_button) = if view.search_visible {
            let fields = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Fill(1),
                    Constraint::Fill(1),
                    Constraint::Length(SEARCH_BUTTON_WIDTH),
                ])
                .split(inner(rows[5]));
            (Some(fields[0]), Some(fields[1]), Some(fields[2]))
        } else {
            (None, None, None)
        };

        Self {
            header,
            help_toggle,
            drop_zone: rows[1],
            file_list: view.file_list_visible.then_some(rows[2]),
            upload_button: button_row[0],
            results,
            download_link,
            inspect_button,
            search,
            lot_a,
            lot_b,
            search_button,
            status: rows[6],
            help_panel: view
                .help_open
                .then(|| centered(area, HELP_PANEL_SIZE.0, HELP_PANEL_SIZE.1)),
        }
    }

    /// Topmost region under a terminal cell. An open help panel covers
    /// whatever is drawn beneath it.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Region> {
        let position = Position::new(column, row);
        if let Some(panel) = self.help_panel {
            if panel.contains(position) {
                return Some(Region::HelpPanel);
            }
        }
        let candidates = [
            (Some(self.help_toggle), Region::HelpToggle),
            (Some(self.drop_zone), Region::DropZone),
            (Some(self.upload_button), Region::UploadButton),
            (self.inspect_button, Region::InspectButton),
            (self.download_link, Region::DownloadLink),
            (self.lot_a, Region::LotA),
            (self.lot_b, Region::LotB),
            (self.search_button, Region::SearchButton),
        ];
        candidates
            .into_iter()
            .find_map(|(rect, region)| rect.filter(|r| r.contains(position)).map(|_| region))
    }
}

/// Area of the file prompt overlay.
pub fn picker_area(area: Rect) -> Rect {
    centered(area, PICKER_SIZE.0, PICKER_SIZE.1)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}
