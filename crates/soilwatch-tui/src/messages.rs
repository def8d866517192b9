//! Message types for communication between the UI and the fetch worker.

use soilwatch_core::ClientError;
use soilwatch_types::Reading;

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dispatch a fetch immediately, outside the regular tick.
    Refresh,
    /// Stop the worker.
    Shutdown,
}

/// Events sent from the worker back to the UI thread.
#[derive(Debug)]
pub enum SensorEvent {
    /// A fetch dispatched with the given sequence number finished.
    FetchCompleted {
        seq: u64,
        result: Result<Vec<Reading>, ClientError>,
    },
}
