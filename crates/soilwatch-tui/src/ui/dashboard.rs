//! Overview, NPK, and device panels.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use soilwatch_types::Reading;

use super::health_color;
use crate::app::App;

/// ZTotal value treated as the top of the gauge scale. Readings above it
/// are already well into Bad territory.
const ZTOTAL_GAUGE_MAX: f64 = 4.0;

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// Draw the overview tab: health gauge plus the RGB channels of the
/// latest reading.
pub(super) fn draw_overview(frame: &mut Frame, area: Rect, app: &App) {
    let Some(latest) = app.poller.latest() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Health status
            Constraint::Length(4), // ZTotal gauge
            Constraint::Length(4), // RGB channels
            Constraint::Min(0),
        ])
        .split(area);

    let status = app.thresholds.classify_reading(latest);
    let status_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            status.label(),
            Style::default()
                .fg(health_color(status))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("as of {}", latest.timestamp.raw()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let status_para = Paragraph::new(status_lines)
        .alignment(Alignment::Center)
        .block(panel_block("Soil Health"));
    frame.render_widget(status_para, layout[0]);

    let ratio = latest
        .ztotal
        .filter(|z| z.is_finite())
        .map(|z| (z / ZTOTAL_GAUGE_MAX).clamp(0.0, 1.0))
        .unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(panel_block("ZTotal"))
        .gauge_style(Style::default().fg(health_color(status)))
        .ratio(ratio)
        .label(format_value(latest.ztotal));
    frame.render_widget(gauge, layout[1]);

    draw_rgb(frame, layout[2], latest);
}

/// Draw the RGB channel readout with a color swatch.
fn draw_rgb(frame: &mut Frame, area: Rect, reading: &Reading) {
    let channel = |v: Option<f64>| v.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 255.0) as u8);
    let swatch = match (
        channel(reading.red),
        channel(reading.green),
        channel(reading.blue),
    ) {
        (Some(r), Some(g), Some(b)) => Some(Color::Rgb(r, g, b)),
        _ => None,
    };

    let mut spans = vec![
        Span::styled("R: ", Style::default().fg(Color::Red)),
        Span::raw(format_value(reading.red)),
        Span::raw("   "),
        Span::styled("G: ", Style::default().fg(Color::Green)),
        Span::raw(format_value(reading.green)),
        Span::raw("   "),
        Span::styled("B: ", Style::default().fg(Color::Blue)),
        Span::raw(format_value(reading.blue)),
    ];
    if let Some(color) = swatch {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("██████", Style::default().fg(color)));
    }

    let lines = vec![Line::from(""), Line::from(spans)];
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel_block("RGB Channels"));
    frame.render_widget(para, area);
}

/// Draw the NPK tab: one gauge per nutrient.
pub(super) fn draw_npk(frame: &mut Frame, area: Rect, app: &App) {
    let Some(latest) = app.poller.latest() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let nutrients = [
        ("Nitrogen (N)", latest.nitrogen, Color::Cyan),
        ("Phosphorus (P)", latest.phosphorus, Color::Magenta),
        ("Potassium (K)", latest.potassium, Color::Yellow),
    ];

    for (i, (name, value, color)) in nutrients.into_iter().enumerate() {
        let ratio = value
            .filter(|v| v.is_finite())
            .map(|v| (v / 100.0).clamp(0.0, 1.0))
            .unwrap_or(0.0);
        let gauge = Gauge::default()
            .block(panel_block(name))
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(format_value(value));
        frame.render_widget(gauge, layout[i]);
    }
}

/// Draw the device info tab.
pub(super) fn draw_device(frame: &mut Frame, area: Rect, app: &App) {
    let Some(latest) = app.poller.latest() else {
        return;
    };

    let device_id = latest.device_id.as_deref().unwrap_or("N/A");
    let firmware = latest.firmware_version.as_deref().unwrap_or("1.0.0");

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<18}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::Gray)),
        ])
    };

    let lines = vec![
        Line::from(""),
        row("Device ID", device_id.to_string()),
        row("Firmware", firmware.to_string()),
        row(
            "Uptime",
            latest
                .uptime_display()
                .unwrap_or_else(|| "0h 0m".to_string()),
        ),
        row("Last reading", latest.timestamp.raw().to_string()),
    ];

    let para = Paragraph::new(lines).block(panel_block("Device Info"));
    frame.render_widget(para, area);
}
