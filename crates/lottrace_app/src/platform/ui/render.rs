use lottrace_core::{AppViewModel, FileIcon, FileRowView, JobSummary, StatusKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::layout::{picker_area, DashboardLayout};
use super::{Chrome, Focus, PickerPrompt};

const TITLE: &str = " LOT Trace Dashboard ";
const SAMPLE_LIMIT: usize = 5;

/// Draws one frame and returns the geometry it used, for hit-testing input.
pub fn render(f: &mut Frame, view: &AppViewModel, chrome: &Chrome) -> DashboardLayout {
    let layout = DashboardLayout::compute(f.area(), view);

    draw_header(f, &layout, view);
    draw_drop_zone(f, &layout, view, chrome);
    if let Some(area) = layout.file_list {
        draw_file_list(f, area, &view.file_rows);
    }
    draw_button(
        f,
        layout.upload_button,
        "Run pipeline",
        view.upload_enabled,
        chrome.focus == Focus::Upload,
    );
    if layout.results.is_some() {
        draw_results(f, &layout, view, chrome);
    }
    if let Some(area) = layout.search {
        if view.search_visible {
            draw_search(f, &layout, area, view, chrome);
        } else {
            draw_search_placeholder(f, area);
        }
    }
    draw_status(f, layout.status, view);

    if let Some(area) = layout.help_panel {
        draw_help(f, area);
    }
    if let Some(prompt) = &chrome.picker {
        draw_picker(f, picker_area(f.area()), prompt);
    }
    layout
}

fn draw_header(f: &mut Frame, layout: &DashboardLayout, view: &AppViewModel) {
    let block = Block::default().borders(Borders::ALL).title(TITLE);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Status: "),
            Span::styled(view.header_status.as_str(), Style::default().fg(Color::Cyan)),
        ]))
        .block(block),
        layout.header,
    );

    let toggle_style = if view.help_open {
        Style::default().fg(Color::Black).bg(Color::Magenta)
    } else {
        Style::default().fg(Color::Magenta)
    };
    f.render_widget(
        Paragraph::new(Span::styled("[F1] Help", toggle_style)),
        layout.help_toggle,
    );
}

fn draw_drop_zone(f: &mut Frame, layout: &DashboardLayout, view: &AppViewModel, chrome: &Chrome) {
    let border = if view.drag_active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if chrome.focus == Focus::DropZone {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text_style = if view.controls_enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let headline = if view.drag_active {
        "Release to add these files"
    } else {
        "Drop files here (paste their paths) or press Enter to browse"
    };
    f.render_widget(
        Paragraph::new(vec![
            Line::styled(headline, text_style),
            Line::styled("Accepted: .xlsx and .csv pipeline inputs", text_style),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Upload "),
        ),
        layout.drop_zone,
    );
}

fn draw_file_list(f: &mut Frame, area: Rect, rows: &[FileRowView]) {
    let lines: Vec<Line> = rows.iter().map(file_row_line).collect();
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Selected files ({}) ", rows.len())),
        ),
        area,
    );
}

pub(crate) fn file_row_line(row: &FileRowView) -> Line<'static> {
    let (glyph, color) = match row.icon {
        FileIcon::Spreadsheet => ("[xlsx]", Color::Green),
        FileIcon::Tabular => ("[csv] ", Color::Blue),
    };
    Line::from(vec![
        Span::styled(glyph, Style::default().fg(color)),
        Span::raw(" "),
        Span::raw(row.name.clone()),
        Span::raw("  "),
        Span::styled(row.size_label.clone(), Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_button(f: &mut Frame, area: Rect, label: &str, enabled: bool, focused: bool) {
    let mut style = if enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    f.render_widget(
        Paragraph::new(Line::styled(label.to_string(), style).centered())
            .block(Block::default().borders(Borders::ALL).border_style(style)),
        area,
    );
}

fn draw_results(f: &mut Frame, layout: &DashboardLayout, view: &AppViewModel, chrome: &Chrome) {
    let (Some(area), Some(panel)) = (layout.results, view.result_panel.as_ref()) else {
        return;
    };

    let mut lines = vec![
        // First line stays blank: the link and the inspect button are drawn over it.
        Line::from(""),
        Line::from(vec![
            Span::raw("Files processed: "),
            Span::raw(if panel.files_processed.is_empty() {
                "-".to_string()
            } else {
                panel.files_processed.join(", ")
            }),
        ]),
    ];
    if let Some(summary) = &view.job_summary {
        lines.extend(summary_lines(summary).into_iter().map(Line::from));
    }
    if let Some(path) = &view.last_export {
        lines.push(Line::from(format!("Last export: {}", path.display())));
    }

    let title = match &view.job_id {
        Some(job_id) => format!(" Pipeline output (job {job_id}) "),
        None => " Pipeline output ".to_string(),
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );

    if let Some(link) = layout.download_link {
        let mut style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED);
        if chrome.focus == Focus::DownloadLink {
            style = style.add_modifier(Modifier::REVERSED);
        }
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("Download: "),
                Span::styled(panel.download_href.clone(), style),
            ])),
            link,
        );
    }
    if let Some(button) = layout.inspect_button {
        let mut style = if view.controls_enabled {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if chrome.focus == Focus::Inspect {
            style = style.add_modifier(Modifier::REVERSED);
        }
        f.render_widget(
            Paragraph::new(Span::styled("[ Inspect job ]", style)),
            button,
        );
    }
}

pub(crate) fn summary_lines(summary: &JobSummary) -> Vec<String> {
    vec![
        format!(
            "Rows: {} | Columns: {}",
            summary.total_rows,
            summary.columns.len()
        ),
        format!(
            "LOT A: {} | LOT B: {}",
            lot_overview(summary.lot_a_count, &summary.lot_a_sample),
            lot_overview(summary.lot_b_count, &summary.lot_b_sample)
        ),
    ]
}

fn lot_overview(count: Option<u64>, sample: &[String]) -> String {
    let Some(count) = count else {
        return "column missing".to_string();
    };
    let shown: Vec<&str> = sample.iter().take(SAMPLE_LIMIT).map(String::as_str).collect();
    if shown.is_empty() {
        format!("{count} unique")
    } else {
        format!("{count} unique (e.g. {})", shown.join(", "))
    }
}

fn draw_search(
    f: &mut Frame,
    layout: &DashboardLayout,
    area: Rect,
    view: &AppViewModel,
    chrome: &Chrome,
) {
    f.render_widget(
        Block::default().borders(Borders::ALL).title(" LOT search "),
        area,
    );

    let fields = [
        (layout.lot_a, "LOT A", view.lot_a.as_str(), Focus::LotA),
        (layout.lot_b, "LOT B", view.lot_b.as_str(), Focus::LotB),
    ];
    for (rect, title, value, focus) in fields {
        let Some(rect) = rect else { continue };
        let focused = chrome.focus == focus;
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let text_style = if view.controls_enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled(value.to_string(), text_style)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {title} ")),
            ),
            rect,
        );
        if focused && view.controls_enabled && chrome.picker.is_none() {
            let offset = (value.chars().count() as u16).min(rect.width.saturating_sub(3));
            f.set_cursor_position(Position::new(rect.x + 1 + offset, rect.y + 1));
        }
    }

    if let Some(button) = layout.search_button {
        draw_button(
            f,
            button,
            "Search",
            view.controls_enabled,
            chrome.focus == Focus::Search,
        );
    }
}

fn draw_search_placeholder(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::styled(
            "Run the pipeline to enable LOT search.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(" LOT search ")),
        area,
    );
}

fn draw_status(f: &mut Frame, area: Rect, view: &AppViewModel) {
    let Some(status) = &view.status else {
        return;
    };
    let (glyph, color) = match status.kind {
        StatusKind::Loading => ("...", Color::Blue),
        StatusKind::Success => ("OK ", Color::Green),
        StatusKind::Error => ("ERR", Color::Red),
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(status.message.clone(), Style::default().fg(color)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<14}"), Style::default().fg(Color::Magenta)),
        Span::raw(action),
    ])
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Workflow:"),
        Line::from("  1. Select or drop pipeline input files"),
        Line::from("  2. Run the pipeline and wait for completion"),
        Line::from("  3. Search by LOT A and/or LOT B to export a CSV"),
        Line::from(""),
        Line::from("Keys:"),
        key_line("Tab/Shift-Tab", "Move focus"),
        key_line("Enter/Space", "Activate focused control"),
        key_line("Paste", "Drop files, or type into a LOT field"),
        key_line("F1", "Open this help"),
        key_line("Esc", "Close this help"),
        key_line("Ctrl-C/Ctrl-Q", "Quit"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Help "),
        ),
        area,
    );
}

fn draw_picker(f: &mut Frame, area: Rect, prompt: &PickerPrompt) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(prompt.input.clone()),
        ]),
        Line::styled(
            "Space separated paths; quote paths that contain spaces.",
            Style::default().fg(Color::DarkGray),
        ),
        Line::styled(
            "Enter selects, Esc cancels.",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(error) = &prompt.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Select files "),
        ),
        area,
    );
    let offset = (prompt.input.chars().count() as u16 + 2).min(area.width.saturating_sub(3));
    f.set_cursor_position(Position::new(area.x + 1 + offset, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottrace_core::{JobId, ResultPanelView, StatusView};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(view: &AppViewModel, chrome: &Chrome) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal
            .draw(|f| {
                render(f, view, chrome);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn idle_view() -> AppViewModel {
        AppViewModel {
            header_status: "Ready".to_string(),
            controls_enabled: true,
            search_placeholder_visible: true,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn idle_dashboard_shows_placeholder() {
        let text = draw(&idle_view(), &Chrome::default());

        assert!(text.contains("LOT Trace Dashboard"));
        assert!(text.contains("Status: Ready"));
        assert!(text.contains("Run the pipeline to enable LOT search."));
        assert!(!text.contains("Pipeline output"));
    }

    #[test]
    fn completed_run_shows_link_and_search() {
        let view = AppViewModel {
            results_visible: true,
            search_visible: true,
            search_placeholder_visible: false,
            job_id: Some(JobId::new("J1")),
            result_panel: Some(ResultPanelView {
                download_href: "/download/J1/final_data.csv".to_string(),
                files_processed: vec!["raw.xlsx".to_string()],
            }),
            status: Some(StatusView {
                kind: StatusKind::Success,
                message: "Pipeline completed successfully!".to_string(),
            }),
            ..idle_view()
        };
        let text = draw(&view, &Chrome::default());

        assert!(text.contains("Download: /download/J1/final_data.csv"));
        assert!(text.contains("Files processed: raw.xlsx"));
        assert!(text.contains("LOT A"));
        assert!(text.contains("Pipeline completed successfully!"));
    }

    #[test]
    fn picker_overlay_shows_inline_error() {
        let chrome = Chrome {
            picker: Some(PickerPrompt {
                input: "/missing.csv".to_string(),
                error: Some("cannot read /missing.csv".to_string()),
            }),
            ..Chrome::default()
        };
        let text = draw(&idle_view(), &chrome);

        assert!(text.contains("Select files"));
        assert!(text.contains("> /missing.csv"));
        assert!(text.contains("cannot read /missing.csv"));
    }

    #[test]
    fn summary_lists_counts_and_samples() {
        let summary = JobSummary {
            total_rows: 120,
            columns: vec!["LOT_A".to_string(), "LOT_B".to_string()],
            lot_a_sample: vec!["A1".to_string(), "A2".to_string()],
            lot_a_count: Some(2),
            lot_b_sample: Vec::new(),
            lot_b_count: None,
        };
        assert_eq!(
            summary_lines(&summary),
            vec![
                "Rows: 120 | Columns: 2".to_string(),
                "LOT A: 2 unique (e.g. A1, A2) | LOT B: column missing".to_string(),
            ]
        );
    }

    #[test]
    fn file_rows_carry_kind_marker() {
        let line = file_row_line(&FileRowView {
            name: "CL_Cleaner.csv".to_string(),
            size_label: "0.01 MB".to_string(),
            icon: FileIcon::Tabular,
        });
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, "[csv]  CL_Cleaner.csv  0.01 MB");
    }
}
