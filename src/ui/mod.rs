mod theme;

use crate::app::{
    AppModel, DetailView, ReplayModal, ReplayModalButton, Screen, SummaryView, View,
};
use crate::domain::{AddressSummary, is_replay_eligible, summary_rows};
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

const SUMMARY_HEADERS: [&str; 4] = ["SRC_IP", "FIRST_EVENT", "LAST_EVENT", "LOGIN_SUCCESS?"];
const DETAIL_HEADERS: [&str; 5] = ["TIMESTAMP", "EVENTID", "USERNAME/PWD", "INPUT", "MESSAGE"];

const INSTANT_COLUMN_WIDTH: u16 = 30;

pub fn render(frame: &mut Frame, model: &AppModel) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    match &model.view {
        View::Summary(view) => render_summary(frame, area, model, view),
        View::Detail(view) => render_detail(frame, area, model, view),
    }

    if let Some(modal) = &model.replay_modal {
        render_replay_modal(frame, area, modal);
    }

    if model.help_open {
        render_help_overlay(frame, area);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, model: &AppModel, view: &SummaryView) {
    let area = inner_area(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let addresses = &model.data.addresses;
    let file_name = model
        .data
        .log_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| model.data.log_path.display().to_string());
    let block = table_block(format!("{file_name} · {} addresses", addresses.len()));

    if addresses.is_empty() {
        let empty = Paragraph::new(vec![
            header_row_line(&SUMMARY_HEADERS),
            Line::from(""),
            Line::from(Span::styled("No events found.", Style::default().fg(theme::DIM))),
        ])
        .block(block);
        frame.render_widget(empty, chunks[0]);
    } else {
        let rows: Vec<Row> = summary_rows(addresses)
            .into_iter()
            .map(|row| {
                let login_style = if row.login_succeeded {
                    Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::MUTED)
                };
                Row::new(vec![
                    Cell::from(single_line(&row.address)),
                    Cell::from(row.first_seen),
                    Cell::from(row.last_seen),
                    Cell::from(row.login_succeeded.to_string()).style(login_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(address_column_width(addresses)),
            Constraint::Length(INSTANT_COLUMN_WIDTH),
            Constraint::Length(INSTANT_COLUMN_WIDTH),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header_row(&SUMMARY_HEADERS))
            .block(block)
            .row_highlight_style(highlight_style())
            .highlight_symbol("▸ ");

        let mut state = TableState::default();
        state.select(Some(view.selected.min(addresses.len() - 1)));
        frame.render_stateful_widget(table, chunks[0], &mut state);
    }

    let footer = footer_paragraph(model);
    frame.render_widget(footer, chunks[1]);
}

fn render_detail(frame: &mut Frame, area: Rect, model: &AppModel, view: &DetailView) {
    let area = inner_area(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let address = model
        .detail_address()
        .map(|summary| summary.address.as_str())
        .unwrap_or_default();
    let block = table_block(format!("{address} · {} events", view.rows.len()));

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|row| {
            let style = if is_replay_eligible(&row.message) {
                Style::default().fg(theme::SUCCESS)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(single_line(&row.timestamp)),
                Cell::from(single_line(&row.eventid)),
                Cell::from(single_line(&row.identity)),
                Cell::from(single_line(&row.input)),
                Cell::from(single_line(&row.message)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(28),
        Constraint::Length(24),
        Constraint::Length(20),
        Constraint::Fill(1),
        Constraint::Fill(2),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&DETAIL_HEADERS))
        .block(block)
        .row_highlight_style(highlight_style())
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    if !view.rows.is_empty() {
        state.select(Some(view.selected.min(view.rows.len() - 1)));
    }
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let footer = footer_paragraph(model);
    frame.render_widget(footer, chunks[1]);
}

fn render_replay_modal(frame: &mut Frame, area: Rect, modal: &ReplayModal) {
    let popup = centered_rect(70, 40, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .padding(Padding::horizontal(1))
        .title("Replay TTY session");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let body = Paragraph::new(vec![
        Line::from("Run with bin/playlog - Docker:"),
        Line::from(""),
        Line::from(Span::styled(
            modal.command.clone(),
            Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
        )),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[0]);

    let mut spans: Vec<Span> = Vec::new();
    for button in ReplayModalButton::ALL {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        let style = if button == modal.selected {
            Style::default()
                .fg(theme::ACCENT)
                .bg(theme::ACCENT_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::MUTED)
        };
        spans.push(Span::styled(format!("[ {} ]", button.label()), style));
    }
    let buttons = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(buttons, chunks[1]);

    let hint = Paragraph::new(footer_keys(Screen::ReplayModal))
        .style(Style::default().fg(theme::DIM))
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[2]);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(64, 60, area);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from("Navigation"),
        Line::from("  - Arrows or j/k: move selection"),
        Line::from("  - PgUp/PgDn, Home/End: jump"),
        Line::from("  - Enter: open address / build replay command"),
        Line::from("  - Esc/Backspace: back (quits on the address list)"),
        Line::from(""),
        Line::from("Replay"),
        Line::from("  - Highlighted rows closed a TTY log and can be replayed"),
        Line::from("  - In the dialog: c copies the command, Esc closes"),
        Line::from(""),
        Line::from("Global"),
        Line::from("  - q (address list) or Ctrl+C: quit"),
        Line::from("  - F1 or ?: toggle this help"),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title("Help (F1 or ? to close)"),
    );
    frame.render_widget(paragraph, popup);
}

fn table_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(title)
}

fn header_row(headers: &[&'static str]) -> Row<'static> {
    Row::new(headers.iter().map(|header| Cell::from(*header)))
        .style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .bottom_margin(1)
}

fn header_row_line(headers: &[&'static str]) -> Line<'static> {
    Line::from(Span::styled(
        headers.join("  "),
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(theme::SURFACE)
        .fg(theme::ACCENT)
        .add_modifier(Modifier::BOLD)
}

fn footer_keys(screen: Screen) -> &'static str {
    match screen {
        Screen::Summary => "Keys: arrows=move  PgUp/PgDn=page  Enter=open  Esc/q=quit  F1/?=help",
        Screen::Detail => {
            "Keys: arrows=move  PgUp/PgDn=page  Enter=replay  Esc=back  Ctrl+C=quit  F1/?=help"
        }
        Screen::ReplayModal => "Keys: ←/→ choose  Enter confirm  c=copy  Esc=close",
    }
}

fn footer_paragraph(model: &AppModel) -> Paragraph<'static> {
    let warnings = model.data.warnings;
    let mut spans: Vec<Span<'static>> = vec![Span::raw(footer_keys(model.screen()))];
    if warnings > 0 {
        spans.push(Span::raw("  ·  "));
        spans.push(Span::styled(
            format!("warnings: {warnings}"),
            Style::default().fg(theme::ERROR),
        ));
    }
    if let Some(message) = model
        .notice
        .as_deref()
        .filter(|message| !message.trim().is_empty())
    {
        spans.push(Span::raw("  ·  "));
        spans.push(Span::styled(message.to_string(), Style::default().fg(theme::FG)));
    }

    Paragraph::new(Line::from(spans)).style(Style::default().fg(theme::DIM))
}

fn address_column_width(addresses: &[AddressSummary]) -> u16 {
    let widest = addresses
        .iter()
        .map(|summary| UnicodeWidthStr::width(summary.address.as_str()))
        .max()
        .unwrap_or(0);
    u16::try_from(widest.clamp(15, 45)).unwrap_or(45)
}

// Table cells are one line tall; tabs and newlines from `input` would break the grid.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

fn inner_area(area: Rect) -> Rect {
    if area.width < 40 || area.height < 12 {
        return area;
    }
    area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    })
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppData, AppEvent, NavInput, update};
    use crate::domain::{DEFAULT_COWRIE_HOME, aggregate_events, decode_event_line};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn model_from_lines(lines: &[&str]) -> AppModel {
        let events = lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| decode_event_line(line, index + 1).expect("decode"))
            .collect();
        AppModel::new(AppData::new(
            PathBuf::from("/var/log/cowrie/cowrie.json"),
            aggregate_events(events),
            0,
            DEFAULT_COWRIE_HOME.to_string(),
        ))
    }

    fn draw(model: &AppModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal.draw(|frame| render(frame, model)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_model_renders_placeholder() {
        let screen = draw(&model_from_lines(&[]));
        assert!(screen.contains("cowrie.json · 0 addresses"));
        assert!(screen.contains("SRC_IP"));
        assert!(screen.contains("No events found."));
    }

    #[test]
    fn summary_lists_addresses_with_login_flag() {
        let model = model_from_lines(&[
            r#"{"src_ip":"192.0.2.10","eventid":"cowrie.login.success","timestamp":"2024-12-17T14:38:20Z"}"#,
            r#"{"src_ip":"192.0.2.20","eventid":"cowrie.login.failed","timestamp":"2024-12-17T14:38:21Z"}"#,
        ]);
        let screen = draw(&model);
        assert!(screen.contains("LOGIN_SUCCESS?"));
        assert!(screen.contains("192.0.2.10"));
        assert!(screen.contains("2024-12-17T14:38:20Z"));
        assert!(screen.contains("true"));
        assert!(screen.contains("false"));
    }

    #[test]
    fn detail_and_modal_render_replay_command() {
        let model = model_from_lines(&[
            r#"{"src_ip":"192.0.2.10","eventid":"cowrie.login.success","username":"admin","password":"admin","timestamp":"2024-12-17T14:38:20Z"}"#,
            r#"{"src_ip":"192.0.2.10","eventid":"cowrie.log.closed","message":"Closing TTY Log: logs/tty/abc123 after 12 seconds","timestamp":"2024-12-17T14:39:20Z"}"#,
        ]);
        let (model, _) = update(model, AppEvent::Nav(NavInput::Confirm));
        let screen = draw(&model);
        assert!(screen.contains("192.0.2.10 · 2 events"));
        assert!(screen.contains("USERNAME/PWD"));
        assert!(screen.contains("admin/admin"));

        let (model, _) = update(model, AppEvent::Nav(NavInput::Select(1)));
        let (model, _) = update(model, AppEvent::Nav(NavInput::Confirm));
        let screen = draw(&model);
        assert!(screen.contains("Run with bin/playlog - Docker:"));
        assert!(screen.contains("/cowrie/cowrie-git/bin/playlog /cowrie/cowrie-git/logs/tty/abc123"));
        assert!(screen.contains("[ Copy to Clipboard ]"));
        assert!(screen.contains("[ Close ]"));
    }

    #[test]
    fn summary_address_cell_is_single_line() {
        let model = model_from_lines(&[
            r#"{"src_ip":"192.0.2.10\tfake","timestamp":"2024-12-17T14:38:20Z"}"#,
        ]);
        assert_eq!(model.data.addresses[0].address, "192.0.2.10\tfake");
        let screen = draw(&model);
        assert!(screen.contains("192.0.2.10 fake"));
    }

    #[test]
    fn control_characters_are_flattened() {
        assert_eq!(single_line("ls\n-la\tx"), "ls -la x");
    }
}
