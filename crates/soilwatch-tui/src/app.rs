//! Application state for the TUI.
//!
//! [`App`] owns the poller state and the history query, applies worker
//! events, and tracks UI-only state (active tab, date entry buffer,
//! transient status messages).

use std::time::Instant;

use time::{Date, OffsetDateTime, format_description};
use tokio::sync::mpsc;
use tracing::debug;

use soilwatch_core::{HealthThresholds, HistoryPage, HistoryQuery, PollerState, view};
use soilwatch_types::{ParseError, ParseResult};

use crate::messages::{Command, SensorEvent};

/// UI tab selection, mirroring the dashboard's four sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Latest reading: health gauge and RGB channels.
    #[default]
    Overview,
    /// Nutrient level bars.
    Npk,
    /// Filterable history table.
    History,
    /// Device metadata.
    Device,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Npk, Tab::History, Tab::Device];

    /// Get the display label for this tab.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Npk => "NPK",
            Tab::History => "History",
            Tab::Device => "Device Info",
        }
    }

    /// Switch to the next tab.
    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Switch to the previous tab.
    pub fn previous(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[i.checked_sub(1).unwrap_or(Self::ALL.len() - 1)]
    }
}

/// Which explicit date bound is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

/// Main application state for the TUI.
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Currently active UI tab.
    pub active_tab: Tab,
    /// Owned polling state (readings, latest, error).
    pub poller: PollerState,
    /// History filter/sort/page parameters.
    pub query: HistoryQuery,
    /// Health classification thresholds.
    pub thresholds: HealthThresholds,
    /// Whether to show the help overlay.
    pub show_help: bool,
    /// Queue of status messages with their creation time.
    pub status_messages: Vec<(String, Instant)>,
    /// Date bound currently being edited, if any.
    pub editing_date: Option<DateField>,
    /// Input buffer for date entry (`YYYY-MM-DD`).
    pub date_input: String,
    /// Channel for sending commands to the background worker.
    pub command_tx: mpsc::Sender<Command>,
    /// Channel for receiving events from the background worker.
    pub event_rx: mpsc::Receiver<SensorEvent>,
}

/// How long status messages stay visible.
const STATUS_MESSAGE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

impl App {
    /// Create a new application with the given command and event channels.
    pub fn new(command_tx: mpsc::Sender<Command>, event_rx: mpsc::Receiver<SensorEvent>) -> Self {
        Self {
            should_quit: false,
            active_tab: Tab::default(),
            poller: PollerState::new(),
            query: HistoryQuery::default(),
            thresholds: HealthThresholds::default(),
            show_help: false,
            status_messages: Vec::new(),
            editing_date: None,
            date_input: String::new(),
            command_tx,
            event_rx,
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Add a status message to the queue.
    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        while self.status_messages.len() > 5 {
            self.status_messages.remove(0);
        }
    }

    /// Remove expired status messages.
    pub fn clean_expired_messages(&mut self) {
        self.status_messages
            .retain(|(_, created)| created.elapsed() < STATUS_MESSAGE_TIMEOUT);
    }

    /// Get the current status message to display.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    /// Handle an incoming worker event.
    pub fn handle_sensor_event(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::FetchCompleted { seq, result } => {
                if !self.poller.apply(seq, result) {
                    debug!(seq, "stale fetch completion ignored");
                }
            }
        }
    }

    /// Compute the current history page.
    ///
    /// Recomputed on every render; the reading list is bounded by one
    /// poll's payload so this stays cheap.
    pub fn history_page(&self, now: OffsetDateTime) -> HistoryPage {
        view(self.poller.readings(), &self.query, &self.thresholds, now)
    }

    /// Move to the next history page, if one exists.
    pub fn next_page(&mut self, now: OffsetDateTime) {
        let total = self.history_page(now).total_pages;
        self.query.set_page(self.query.page() + 1, total);
    }

    /// Move to the previous history page, if one exists.
    pub fn previous_page(&mut self, now: OffsetDateTime) {
        let total = self.history_page(now).total_pages;
        if let Some(prev) = self.query.page().checked_sub(1) {
            self.query.set_page(prev, total);
        }
    }

    /// Cycle the health status filter.
    pub fn cycle_status_filter(&mut self) {
        self.query.cycle_status();
        let label = self
            .query
            .status()
            .map(|s| s.label())
            .unwrap_or("All");
        self.push_status_message(format!("Status filter: {}", label));
    }

    /// Cycle the preset date range.
    pub fn cycle_date_range(&mut self) {
        self.query.cycle_range();
        self.push_status_message(format!("Date range: {}", self.query.range().label()));
    }

    /// Flip the timestamp sort direction.
    pub fn toggle_sort(&mut self) {
        self.query.toggle_sort();
        let direction = if self.query.ascending() {
            "Ascending"
        } else {
            "Descending"
        };
        self.push_status_message(format!("Sort date: {}", direction));
    }

    /// Start editing an explicit date bound.
    pub fn start_date_edit(&mut self, field: DateField) {
        let current = match field {
            DateField::Start => self.query.start_date(),
            DateField::End => self.query.end_date(),
        };
        self.date_input = current.map(format_date).unwrap_or_default();
        self.editing_date = Some(field);
    }

    /// Cancel date editing.
    pub fn cancel_date_edit(&mut self) {
        self.editing_date = None;
        self.date_input.clear();
    }

    /// Handle character input for date editing.
    pub fn date_input_char(&mut self, c: char) {
        if self.date_input.len() < 10 && (c.is_ascii_digit() || c == '-') {
            self.date_input.push(c);
        }
    }

    /// Handle backspace for date editing.
    pub fn date_input_backspace(&mut self) {
        self.date_input.pop();
    }

    /// Apply the edited date bound. An empty buffer clears the bound.
    ///
    /// On a parse failure the edit stays open with the buffer intact so
    /// the value can be corrected in place.
    pub fn submit_date_edit(&mut self) {
        let Some(field) = self.editing_date else {
            return;
        };

        let input = self.date_input.trim();
        let date = if input.is_empty() {
            None
        } else {
            match parse_date(input) {
                Ok(date) => Some(date),
                Err(e) => {
                    self.push_status_message(e.to_string());
                    return;
                }
            }
        };

        self.editing_date = None;
        self.date_input.clear();

        match field {
            DateField::Start => self.query.set_start_date(date),
            DateField::End => self.query.set_end_date(date),
        }
        let label = match field {
            DateField::Start => "Start date",
            DateField::End => "End date",
        };
        match date {
            Some(d) => self.push_status_message(format!("{}: {}", label, format_date(d))),
            None => self.push_status_message(format!("{} cleared", label)),
        }
    }
}

/// Parse a user-entered `YYYY-MM-DD` date.
fn parse_date(input: &str) -> ParseResult<Date> {
    format_description::parse("[year]-[month]-[day]")
        .ok()
        .and_then(|items| Date::parse(input, &items).ok())
        .ok_or_else(|| ParseError::InvalidDate(input.to_string()))
}

/// Format a date as `YYYY-MM-DD` for display and editing.
pub fn format_date(date: Date) -> String {
    format_description::parse("[year]-[month]-[day]")
        .ok()
        .and_then(|items| date.format(&items).ok())
        .unwrap_or_else(|| date.to_string())
}
