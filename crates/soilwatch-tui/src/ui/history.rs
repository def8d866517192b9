//! History panel rendering.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use soilwatch_core::HistoryPage;

use super::health_color;
use crate::app::{App, DateField, format_date};

/// Draw the history panel: filter line, paged table, page footer.
pub(super) fn draw_history_panel(frame: &mut Frame, area: Rect, app: &App, page: &HistoryPage) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter line
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Page footer
        ])
        .split(area);

    draw_filter_line(frame, layout[0], app);
    draw_table(frame, layout[1], app, page);
    draw_footer(frame, layout[2], page);
}

/// One-line summary of the active filters, doubling as the date entry
/// field while a bound is being edited.
fn draw_filter_line(frame: &mut Frame, area: Rect, app: &App) {
    let label = |text: String| Span::styled(text, Style::default().fg(Color::Gray));
    let key = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));

    let status = app
        .query
        .status()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "All".to_string());
    let sort = if app.query.ascending() {
        "Oldest first"
    } else {
        "Newest first"
    };

    let date_span = |field: DateField, bound: Option<time::Date>| {
        if app.editing_date == Some(field) {
            Span::styled(
                format!("{}_", app.date_input),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            label(bound.map(format_date).unwrap_or_else(|| "-".to_string()))
        }
    };

    let spans = vec![
        key(" Status: "),
        label(status),
        key("  Range: "),
        label(app.query.range().label().to_string()),
        key("  From: "),
        date_span(DateField::Start, app.query.start_date()),
        key("  To: "),
        date_span(DateField::End, app.query.end_date()),
        key("  Sort: "),
        label(sort.to_string()),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App, page: &HistoryPage) {
    let block = Block::default()
        .title(Span::styled(
            " History ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if page.rows.is_empty() {
        let msg = Paragraph::new("No data matching filters.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let header = Row::new(
        [
            "Timestamp",
            "Device ID",
            "N",
            "P",
            "K",
            "ZTotal",
            "Health Status",
            "RGB",
        ]
        .map(|h| Cell::from(Span::styled(h, Style::default().add_modifier(Modifier::BOLD)))),
    )
    .style(Style::default().fg(Color::Cyan));

    let value = |v: Option<f64>| match v {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    };

    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|reading| {
            let status = app.thresholds.classify_reading(reading);
            let rgb = format!(
                "{}/{}/{}",
                value(reading.red),
                value(reading.green),
                value(reading.blue)
            );
            Row::new([
                Cell::from(reading.timestamp.raw().to_string()),
                Cell::from(reading.device_id.clone().unwrap_or_else(|| "N/A".into())),
                Cell::from(value(reading.nitrogen)),
                Cell::from(value(reading.phosphorus)),
                Cell::from(value(reading.potassium)),
                Cell::from(value(reading.ztotal)),
                Cell::from(Span::styled(
                    status.label(),
                    Style::default().fg(health_color(status)),
                )),
                Cell::from(rgb),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(17),
        Constraint::Min(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, page: &HistoryPage) {
    let text = format!(
        " Page {} of {}  ({} rows)",
        page.page, page.total_pages, page.total_rows
    );
    let footer = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)));
    frame.render_widget(footer, area);
}
