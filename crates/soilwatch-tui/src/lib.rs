//! Terminal dashboard for soilwatch NPK sensor feeds.
//!
//! This crate ties together the rendering, input handling, and the
//! background fetch worker. It handles:
//!
//! - Terminal setup and restoration
//! - Channel creation for worker communication
//! - The main event loop with input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod input;
pub mod messages;
pub mod ui;
pub mod worker;

pub use app::App;
pub use messages::{Command, SensorEvent};
pub use worker::FetchWorker;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::info;

use soilwatch_core::SensorClient;

/// Options for running the dashboard.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Sensor feed endpoint.
    pub url: String,
    /// Poll interval.
    pub interval: Duration,
}

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard until the user quits.
///
/// Spawns the fetch worker, runs the event loop, and restores the
/// terminal even when the loop errors.
pub async fn run(options: RunOptions) -> Result<()> {
    let client = SensorClient::new(&options.url)?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<SensorEvent>(32);

    let worker = FetchWorker::new(cmd_rx, event_tx, client, options.interval);
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(cmd_tx.clone(), event_rx);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx).await;

    let _ = cmd_tx.try_send(Command::Shutdown);
    restore_terminal()?;
    let _ = worker_handle.await;

    info!("dashboard stopped");
    result
}

/// Main event loop for the TUI.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();

        let now = OffsetDateTime::now_utc();
        let page = app.history_page(now);
        terminal.draw(|f| ui::draw(f, app, &page))?;

        // Poll for keyboard events with a timeout so worker events and
        // the clock keep flowing.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = input::handle_key(key, app.editing_date.is_some())
            && let Some(cmd) = input::apply_action(app, action, now)
        {
            let _ = command_tx.try_send(cmd);
        }

        // Non-blocking receive of worker events.
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_sensor_event(event);
        }
    }

    Ok(())
}
