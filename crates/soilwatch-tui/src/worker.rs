//! Background worker that polls the sensor feed.
//!
//! The worker owns the [`SensorClient`] and runs in its own Tokio task so
//! network latency never blocks the render loop. It communicates with the
//! UI over channels:
//!
//! - Receives [`Command`]s (manual refresh, shutdown)
//! - Sends [`SensorEvent`]s carrying fetch results
//!
//! Each tick dispatches a fresh fetch even if an earlier one is still in
//! flight; completions carry the sequence number assigned at dispatch time
//! and the UI-side poller discards stale ones. The recurring timer stops
//! with the worker, so nothing keeps polling after teardown.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use soilwatch_core::SensorClient;

use crate::messages::{Command, SensorEvent};

/// Background worker driving the recurring poll.
pub struct FetchWorker {
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<SensorEvent>,
    client: SensorClient,
    interval: Duration,
    seq: u64,
}

impl FetchWorker {
    /// Create a new worker polling `client` every `interval`.
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<SensorEvent>,
        client: SensorClient,
        interval: Duration,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            client,
            interval,
            seq: 0,
        }
    }

    /// Run the worker until shutdown or channel close.
    ///
    /// The first tick fires immediately, so the dashboard gets data on
    /// startup rather than after one full interval.
    pub async fn run(mut self) {
        info!(url = self.client.url(), interval = ?self.interval, "fetch worker started");

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.dispatch_fetch(),
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Refresh) => self.dispatch_fetch(),
                    Some(Command::Shutdown) => {
                        info!("fetch worker received shutdown command");
                        break;
                    }
                    None => {
                        info!("command channel closed, stopping fetch worker");
                        break;
                    }
                },
            }
        }

        info!("fetch worker stopped");
    }

    /// Start one fetch without waiting for earlier ones to finish.
    fn dispatch_fetch(&mut self) {
        self.seq += 1;
        let seq = self.seq;
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_readings().await;
            let _ = event_tx.send(SensorEvent::FetchCompleted { seq, result }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_worker_stops_on_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, _event_rx) = mpsc::channel(4);
        let client = SensorClient::new("http://localhost:9/feed").unwrap();

        let worker = FetchWorker::new(cmd_rx, event_tx, client, Duration::from_secs(3600));
        let handle = tokio::spawn(worker.run());

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_stops_when_channel_closes() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, _event_rx) = mpsc::channel(4);
        let client = SensorClient::new("http://localhost:9/feed").unwrap();

        let worker = FetchWorker::new(cmd_rx, event_tx, client, Duration::from_secs(3600));
        let handle = tokio::spawn(worker.run());

        drop(cmd_tx);
        handle.await.unwrap();
    }
}
