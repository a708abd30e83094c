use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use dashboard_logging::{dash_debug, dash_info, dash_warn};
use lottrace_core::{update, AppState, AppViewModel, ClickTarget, Key, Msg, SelectedFile};
use lottrace_engine::{describe_files, parse_dropped_paths};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::effects::{EffectOutcome, EffectRunner};
use super::mapping;
use super::ui::{self, Chrome, DashboardLayout, Focus, PickerPrompt, Region};
use crate::config::AppConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(config: AppConfig) -> Result<()> {
    // Bad start-up paths are reported before the terminal is taken over.
    let initial_files = select_initial_files(&config.initial_files)?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx)?;
    let mut app = App::new(runner, msg_rx);
    if !initial_files.is_empty() {
        app.dispatch(Msg::FilesSelected(initial_files));
    }

    let mut tui = Tui::enter()?;
    dash_info!("Dashboard started");
    let result = app.run(&mut tui);
    dash_info!("Dashboard stopped");
    result
}

fn select_initial_files(paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
    let files = describe_files(paths).context("cannot select start-up files")?;
    Ok(files.into_iter().map(mapping::selected_file).collect())
}

/// Confirming an empty prompt clears the selection, like an empty file dialog.
fn picker_selection(input: &str) -> Result<Vec<SelectedFile>> {
    let paths = parse_dropped_paths(input);
    if paths.is_empty() {
        return Ok(Vec::new());
    }
    let files = describe_files(&paths)?;
    Ok(files.into_iter().map(mapping::selected_file).collect())
}

/// Owns the terminal in raw/alternate-screen mode and restores it on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        ) {
            let _ = disable_raw_mode();
            return Err(err).context("enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

struct App {
    state: AppState,
    view: AppViewModel,
    chrome: Chrome,
    layout: Option<DashboardLayout>,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    hovering_drop_zone: bool,
    needs_redraw: bool,
    quit: bool,
}

impl App {
    fn new(runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        let state = AppState::default();
        let view = state.view();
        Self {
            state,
            view,
            chrome: Chrome::default(),
            layout: None,
            runner,
            msg_rx,
            hovering_drop_zone: false,
            needs_redraw: true,
            quit: false,
        }
    }

    fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.quit {
            for msg in self.runner.poll_engine() {
                self.dispatch(msg);
            }
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }

            if self.needs_redraw {
                let view = &self.view;
                let chrome = &self.chrome;
                let mut layout = None;
                tui.terminal
                    .draw(|f| layout = Some(ui::render(f, view, chrome)))
                    .context("draw frame")?;
                self.layout = layout;
                self.needs_redraw = false;
            }

            if event::poll(POLL_INTERVAL).context("poll terminal events")? {
                match event::read().context("read terminal event")? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Paste(text) => self.handle_paste(&text),
                    Event::Resize(_, _) => self.needs_redraw = true,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> EffectOutcome {
        dash_debug!("dispatch {}", msg_label(&msg));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view = state.view();
            self.needs_redraw = true;
        }
        self.state = state;

        let outcome = self.runner.run(effects);
        if outcome.open_picker && self.chrome.picker.is_none() {
            self.chrome.picker = Some(PickerPrompt::default());
            self.needs_redraw = true;
        }
        outcome
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.quit = true;
            return;
        }
        if self.chrome.picker.is_some() {
            self.handle_picker_key(key);
            return;
        }

        // The dashboard sees every key first and may cancel the control's default handling.
        let core_key = match key.code {
            KeyCode::Esc => Key::Escape,
            KeyCode::F(1) => Key::F1,
            _ => Key::Other,
        };
        if self.dispatch(Msg::KeyPressed(core_key)).prevent_default {
            return;
        }

        match key.code {
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Enter => self.activate_focus(),
            KeyCode::Char(' ') if !is_text_field(self.chrome.focus) => self.activate_focus(),
            KeyCode::Char(c) if !ctrl => self.edit_focused_field(|value| value.push(c)),
            KeyCode::Backspace => self.edit_focused_field(|value| {
                value.pop();
            }),
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.chrome.picker.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.chrome.picker = None,
            KeyCode::Enter => self.submit_picker(),
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn submit_picker(&mut self) {
        let Some(prompt) = self.chrome.picker.as_mut() else {
            return;
        };
        match picker_selection(&prompt.input) {
            Ok(files) => {
                self.chrome.picker = None;
                self.dispatch(Msg::FilesSelected(files));
            }
            Err(err) => prompt.error = Some(err.to_string()),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.chrome.picker.is_some() {
            return;
        }
        let region = self
            .layout
            .as_ref()
            .and_then(|layout| layout.hit_test(mouse.column, mouse.row));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = match region {
                    Some(Region::HelpPanel) => ClickTarget::HelpPanel,
                    Some(Region::HelpToggle) => ClickTarget::HelpToggle,
                    _ => ClickTarget::Elsewhere,
                };
                self.dispatch(Msg::Clicked(target));
                if let Some(region) = region {
                    self.click_region(region);
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let over = region == Some(Region::DropZone);
                if over != self.hovering_drop_zone {
                    self.hovering_drop_zone = over;
                    self.dispatch(if over { Msg::DragOver } else { Msg::DragLeave });
                }
            }
            _ => {}
        }
    }

    fn click_region(&mut self, region: Region) {
        let (focus, msg) = match region {
            Region::HelpPanel => return,
            Region::HelpToggle => (None, Some(Msg::HelpToggleClicked)),
            Region::DropZone => (Some(Focus::DropZone), Some(Msg::DropZoneClicked)),
            Region::UploadButton => (Some(Focus::Upload), Some(Msg::UploadClicked)),
            Region::DownloadLink => (Some(Focus::DownloadLink), Some(Msg::DownloadLinkActivated)),
            Region::InspectButton => (Some(Focus::Inspect), Some(Msg::InspectClicked)),
            Region::LotA => (Some(Focus::LotA), None),
            Region::LotB => (Some(Focus::LotB), None),
            Region::SearchButton => (Some(Focus::Search), Some(Msg::SearchClicked)),
        };
        if let Some(focus) = focus {
            self.set_focus(focus);
        }
        if let Some(msg) = msg {
            self.dispatch(msg);
        }
    }

    /// Pasted text goes to the prompt or a focused field; anywhere else it is a file drop.
    fn handle_paste(&mut self, text: &str) {
        if let Some(prompt) = self.chrome.picker.as_mut() {
            prompt.input.push_str(text.trim_end_matches(['\r', '\n']));
            self.needs_redraw = true;
            return;
        }
        if is_text_field(self.chrome.focus) {
            let single_line: String = text.chars().filter(|c| !c.is_control()).collect();
            self.edit_focused_field(|value| value.push_str(&single_line));
            return;
        }

        let mut files = Vec::new();
        for path in parse_dropped_paths(text) {
            match describe_files(std::slice::from_ref(&path)) {
                Ok(found) => files.extend(found.into_iter().map(mapping::selected_file)),
                Err(err) => dash_warn!("Skipping dropped path: {}", err),
            }
        }
        if files.is_empty() {
            dash_warn!("Paste contained no readable files");
            return;
        }
        self.dispatch(Msg::Dropped(files));
        self.hovering_drop_zone = false;
    }

    fn edit_focused_field(&mut self, edit: impl FnOnce(&mut String)) {
        match self.chrome.focus {
            Focus::LotA => {
                let mut value = self.view.lot_a.clone();
                edit(&mut value);
                self.dispatch(Msg::LotAChanged(value));
            }
            Focus::LotB => {
                let mut value = self.view.lot_b.clone();
                edit(&mut value);
                self.dispatch(Msg::LotBChanged(value));
            }
            _ => {}
        }
    }

    fn activate_focus(&mut self) {
        let msg = match self.chrome.focus {
            Focus::DropZone => Msg::DropZoneClicked,
            Focus::Upload => Msg::UploadClicked,
            Focus::DownloadLink => Msg::DownloadLinkActivated,
            Focus::Inspect => Msg::InspectClicked,
            Focus::LotA | Focus::LotB | Focus::Search => Msg::SearchClicked,
        };
        self.dispatch(msg);
    }

    fn move_focus(&mut self, forward: bool) {
        let next = next_focus(self.chrome.focus, &self.view, forward);
        self.set_focus(next);
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.chrome.focus != focus {
            self.chrome.focus = focus;
            self.needs_redraw = true;
        }
    }
}

fn is_text_field(focus: Focus) -> bool {
    matches!(focus, Focus::LotA | Focus::LotB)
}

/// Controls currently on screen, in tab order.
fn focus_order(view: &AppViewModel) -> Vec<Focus> {
    let mut order = vec![Focus::DropZone, Focus::Upload];
    if view.results_visible {
        order.extend([Focus::DownloadLink, Focus::Inspect]);
    }
    if view.search_visible {
        order.extend([Focus::LotA, Focus::LotB, Focus::Search]);
    }
    order
}

fn next_focus(current: Focus, view: &AppViewModel, forward: bool) -> Focus {
    let order = focus_order(view);
    let Some(index) = order.iter().position(|focus| *focus == current) else {
        return Focus::DropZone;
    };
    let len = order.len();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    order[next]
}

/// Message name without payloads; keeps file bodies and paths out of the log.
fn msg_label(msg: &Msg) -> &'static str {
    match msg {
        Msg::FilesSelected(_) => "FilesSelected",
        Msg::DropZoneClicked => "DropZoneClicked",
        Msg::DragOver => "DragOver",
        Msg::DragLeave => "DragLeave",
        Msg::Dropped(_) => "Dropped",
        Msg::UploadClicked => "UploadClicked",
        Msg::UploadFinished { .. } => "UploadFinished",
        Msg::LotAChanged(_) => "LotAChanged",
        Msg::LotBChanged(_) => "LotBChanged",
        Msg::SearchClicked => "SearchClicked",
        Msg::SearchFinished { .. } => "SearchFinished",
        Msg::ExportSaved { .. } => "ExportSaved",
        Msg::ExportFailed(_) => "ExportFailed",
        Msg::DownloadLinkActivated => "DownloadLinkActivated",
        Msg::DownloadFinished { .. } => "DownloadFinished",
        Msg::InspectClicked => "InspectClicked",
        Msg::InspectFinished { .. } => "InspectFinished",
        Msg::StatusDismissDue { .. } => "StatusDismissDue",
        Msg::HelpToggleClicked => "HelpToggleClicked",
        Msg::Clicked(_) => "Clicked",
        Msg::KeyPressed(_) => "KeyPressed",
        Msg::NoOp => "NoOp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn view_with(results: bool, search: bool) -> AppViewModel {
        AppViewModel {
            results_visible: results,
            search_visible: search,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn tab_order_skips_hidden_sections() {
        let view = view_with(false, false);
        assert_eq!(next_focus(Focus::DropZone, &view, true), Focus::Upload);
        assert_eq!(next_focus(Focus::Upload, &view, true), Focus::DropZone);
        assert_eq!(next_focus(Focus::DropZone, &view, false), Focus::Upload);
    }

    #[test]
    fn tab_order_covers_search_after_a_run() {
        let view = view_with(true, true);
        let mut focus = Focus::DropZone;
        let mut seen = Vec::new();
        for _ in 0..7 {
            focus = next_focus(focus, &view, true);
            seen.push(focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::Upload,
                Focus::DownloadLink,
                Focus::Inspect,
                Focus::LotA,
                Focus::LotB,
                Focus::Search,
                Focus::DropZone,
            ]
        );
    }

    #[test]
    fn focus_on_hidden_control_resets() {
        let view = view_with(false, false);
        assert_eq!(next_focus(Focus::LotB, &view, true), Focus::DropZone);
    }

    #[test]
    fn start_up_files_are_described() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.xlsx");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let files = select_initial_files(&[path.clone()]).unwrap();

        assert_eq!(files, vec![SelectedFile::new("raw.xlsx", 2048, path)]);
    }

    #[test]
    fn missing_start_up_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = select_initial_files(&[dir.path().join("absent.csv")]).unwrap_err();
        assert!(err.to_string().contains("cannot select start-up files"));
    }

    #[test]
    fn empty_picker_input_clears_selection() {
        assert_eq!(picker_selection("").unwrap(), Vec::<SelectedFile>::new());
        assert_eq!(picker_selection("   ").unwrap(), Vec::<SelectedFile>::new());
    }

    #[test]
    fn picker_input_is_described_or_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CL_Cleaner.csv");
        fs::write(&path, b"LOT_A\n").unwrap();

        let files = picker_selection(&path.display().to_string()).unwrap();
        assert_eq!(files, vec![SelectedFile::new("CL_Cleaner.csv", 6, path)]);

        let missing = dir.path().join("absent.csv");
        assert!(picker_selection(&missing.display().to_string()).is_err());
    }
}
