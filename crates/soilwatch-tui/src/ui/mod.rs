//! Main UI layout and rendering for the dashboard.
//!
//! The layout consists of:
//!
//! - **Header**: Title and latest-reading summary
//! - **Tab bar**: Overview, NPK, History, Device Info
//! - **Main content**: The active tab's panel
//! - **Status bar**: Key hints and transient status messages
//!
//! Error and loading phases replace the whole layout: a fetch error is
//! exclusive, and until the first successful fetch only a loading screen
//! shows.

mod dashboard;
mod history;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use soilwatch_core::{DisplayState, HealthStatus, HistoryPage};

use crate::app::{App, Tab};

/// Color for a health status, matching the severity scale.
pub(crate) fn health_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Excellent => Color::Green,
        HealthStatus::Good => Color::LightGreen,
        HealthStatus::Moderate => Color::Yellow,
        HealthStatus::Bad => Color::Red,
        HealthStatus::Unknown | _ => Color::DarkGray,
    }
}

/// Draw the complete interface.
pub fn draw(frame: &mut Frame, app: &App, page: &HistoryPage) {
    match app.poller.display_state() {
        DisplayState::Error(message) => {
            draw_error_screen(frame, message);
            return;
        }
        DisplayState::Loading => {
            draw_loading_screen(frame);
            return;
        }
        DisplayState::Ready => {}
    }

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);
    draw_tab_bar(frame, main_layout[1], app);

    match app.active_tab {
        Tab::Overview => dashboard::draw_overview(frame, main_layout[2], app),
        Tab::Npk => dashboard::draw_npk(frame, main_layout[2], app),
        Tab::History => history::draw_history_panel(frame, main_layout[2], app, page),
        Tab::Device => dashboard::draw_device(frame, main_layout[2], app),
    }

    draw_status_bar(frame, main_layout[3], app);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Full-screen error state. Nothing else renders while a fetch error is
/// current; the next successful poll clears it.
fn draw_error_screen(frame: &mut Frame, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Unable to reach the sensor feed",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "r",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " to retry or wait for the next poll",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(
            " Soilwatch ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(para, frame.area());
}

/// Full-screen loading state shown before the first reading arrives.
fn draw_loading_screen(frame: &mut Frame) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading sensor data...",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(
            " Soilwatch ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(para, frame.area());
}

/// Draw the header bar with app title and latest-reading summary.
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " Soilwatch ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("NPK Monitor ", Style::default().fg(Color::DarkGray)),
    ];

    if let Some(latest) = app.poller.latest() {
        let status = app.thresholds.classify_reading(latest);
        spans.push(Span::styled(
            format!(" {} ", status.label()),
            Style::default().fg(health_color(status)),
        ));
        if let Some(ztotal) = latest.ztotal {
            spans.push(Span::styled(
                format!(" ZTotal:{:.2} ", ztotal),
                Style::default().fg(Color::Gray),
            ));
        }
        spans.push(Span::styled(
            format!(" {} ", latest.timestamp.raw()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans));
    frame.render_widget(header, area);
}

/// Draw the tab bar with an underline on the active tab.
fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let tab_titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let is_active = *tab == app.active_tab;
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!(" {} ", tab.label()), style))
        })
        .collect();

    let selected = Tab::ALL
        .iter()
        .position(|t| *t == app.active_tab)
        .unwrap_or(0);

    let tabs_widget = ratatui::widgets::Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .divider(Span::styled(" | ", Style::default().fg(Color::DarkGray)))
        .select(selected);

    frame.render_widget(tabs_widget, area);
}

/// Context-sensitive key hints for the status bar.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("?", "help"), ("Tab", "switch"), ("r", "refresh")];

    if app.active_tab == Tab::History {
        hints.push(("f", "status"));
        hints.push(("d", "range"));
        hints.push(("s", "sort"));
        hints.push(("[/]", "dates"));
        hints.push(("←/→", "page"));
    }

    hints.push(("q", "quit"));
    hints
}

/// Draw the status bar with hints or the latest status message.
fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let spans = if let Some(msg) = app.current_status_message() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(Color::Gray),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help overlay listing all keybindings.
fn draw_help_overlay(frame: &mut Frame) {
    let bindings = [
        ("q / Esc", "Quit"),
        ("Tab / l", "Next tab"),
        ("Shift+Tab / h", "Previous tab"),
        ("1-4", "Jump to tab"),
        ("r", "Refresh now"),
        ("f", "Cycle health status filter"),
        ("d", "Cycle date range"),
        ("s", "Toggle sort direction"),
        ("[", "Edit start date"),
        ("]", "Edit end date"),
        ("← / p", "Previous page"),
        ("→ / n", "Next page"),
        ("?", "Toggle this help"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in bindings {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<14}", key),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc, Style::default().fg(Color::Gray)),
        ]));
    }
    lines.push(Line::from(""));

    let height = (lines.len() as u16 + 2).min(frame.area().height);
    let width = 44.min(frame.area().width);
    let popup = centered_rect(width, height, frame.area());

    let block = Block::default()
        .title(Span::styled(
            " Keys ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Center a fixed-size rect within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
