use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Focus, Screen};
use crate::config::ConfigApi;
use crate::editor::{FormField, FormMode, StatusKind};
use crate::view::{STREAM_COLUMNS, ViewModel};

pub fn render<A: ConfigApi>(frame: &mut Frame, app: &mut App<A>) {
    let view = app.view();

    match app.screen.clone() {
        Screen::Loading => render_busy_screen(frame, "Loading configuration..."),
        Screen::Saving => render_busy_screen(frame, "Saving configuration..."),
        Screen::Main => render_main_screen(frame, app, &view),
        Screen::Form => {
            render_main_screen(frame, app, &view);
            render_form(frame, app);
        }
        Screen::Confirm(pending) => {
            render_main_screen(frame, app, &view);
            render_confirm(frame, pending.prompt());
        }
    }
}

fn render_busy_screen(frame: &mut Frame, msg: &str) {
    let area = centered(frame.area(), 60, 7);

    let loading_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Working ");

    let loading = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ◐ ", Style::default().fg(Color::Yellow)),
            Span::raw(msg),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Please wait...",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(loading_block);

    frame.render_widget(loading, area);
}

fn render_main_screen<A: ConfigApi>(frame: &mut Frame, app: &mut App<A>, view: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Streams
            Constraint::Length(8), // Plates
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    // Header (show status message if available)
    let (header_text, header_color) = match app.get_status() {
        Some(status) => (status.text.clone(), status_color(&status.kind)),
        None => (
            format!(
                "{} streams on {} devices, {} ignored plates",
                view.streams.len(),
                app.editor.config().device_count(),
                view.plates.len()
            ),
            Color::Cyan,
        ),
    };
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(header_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" LPR Config - {} ", app.source)),
        );
    frame.render_widget(header, chunks[0]);

    render_streams_table(frame, app, view, chunks[1]);

    let plate_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_plates_list(frame, app, view, plate_chunks[0]);
    render_plate_input(frame, app, plate_chunks[1]);

    // Footer
    let footer_text = match app.focus {
        Focus::Streams => "[a] Add  [e] Edit  [d] Delete  [Tab] Focus  [s] Save  [r] Reload  [q] Quit",
        Focus::Plates => "[d] Remove  [Tab] Focus  [s] Save  [r] Reload  [q] Quit",
        Focus::PlateInput => "[Enter] Add plate  [Esc] Back  [Tab] Focus",
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(footer, chunks[3]);
}

fn render_streams_table<A: ConfigApi>(
    frame: &mut Frame,
    app: &mut App<A>,
    view: &ViewModel,
    area: Rect,
) {
    let header = Row::new(STREAM_COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = view
        .streams
        .iter()
        .map(|row| Row::new(row.cells().map(Cell::from)))
        .collect();

    let focused = app.focus == Focus::Streams;
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(" RTSP Streams "),
    )
    .row_highlight_style(highlight_style(focused))
    .highlight_symbol(">> ");
    frame.render_stateful_widget(table, area, &mut app.stream_table_state);
}

fn render_plates_list<A: ConfigApi>(
    frame: &mut Frame,
    app: &mut App<A>,
    view: &ViewModel,
    area: Rect,
) {
    let items: Vec<ListItem> = view
        .plates
        .iter()
        .map(|row| ListItem::new(row.plate.clone()))
        .collect();

    let focused = app.focus == Focus::Plates;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused))
                .title(" Ignored Plates "),
        )
        .highlight_style(highlight_style(focused))
        .highlight_symbol(">> ");
    frame.render_stateful_widget(list, area, &mut app.plate_list_state);
}

fn render_plate_input<A: ConfigApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let focused = app.focus == Focus::PlateInput;
    let cursor = if focused { "_" } else { "" };
    let input = Paragraph::new(vec![
        Line::from(""),
        Line::from(format!(" {}{}", app.plate_input, cursor)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(" New Plate "),
    );
    frame.render_widget(input, area);
}

fn render_form<A: ConfigApi>(frame: &mut Frame, app: &App<A>) {
    let Some(form) = app.editor.form() else {
        return;
    };

    let title = match &form.mode {
        FormMode::Add => " Add Stream ".to_string(),
        FormMode::Edit(target) => {
            format!(" Edit Stream ({} #{}) ", target.device_id, target.index)
        }
    };

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = field == app.form_field;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", field.label()), label_style),
            Span::raw(format!("{}{}", form.value(field), cursor)),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(status) = app.get_status().filter(|s| s.is_error()) {
        lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  [Enter] Save  [Tab] Next field  [Esc] Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let area = centered(frame.area(), 70, 14);
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn render_confirm(frame: &mut Frame, prompt: &str) {
    let area = centered(frame.area(), 60, 7);
    let dialog = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ? ", Style::default().fg(Color::Yellow)),
            Span::raw(prompt),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  [y] Yes  [n] No",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn status_color(kind: &StatusKind) -> Color {
    match kind {
        StatusKind::Success => Color::Green,
        StatusKind::Error => Color::Red,
        StatusKind::Info => Color::Cyan,
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn highlight_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Fixed-height box, `percent_x` wide, centered in `area`
fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
