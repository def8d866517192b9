//! Polling state for the dashboard.
//!
//! [`PollerState`] is a reducer: all mutable dashboard state (the reading
//! list, the latest reading, the error slot) is owned here and mutated
//! only through [`PollerState::apply`]. Fetches themselves run elsewhere;
//! each one is tagged with a monotonically increasing sequence number at
//! dispatch time and a completion is discarded if a newer one has already
//! been applied, so a slow early response can never overwrite the result
//! of a faster later one.

use tracing::{debug, warn};

use soilwatch_types::Reading;

use crate::client::ClientError;

/// Lifecycle phase of the poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has completed yet.
    #[default]
    Loading,
    /// At least one fetch (successful or failed) has completed.
    Ready,
}

/// What consumers should render, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState<'a> {
    /// A fetch error is set; show it exclusively.
    Error(&'a str),
    /// No latest reading yet; show a loading state.
    Loading,
    /// Render the dashboard normally.
    Ready,
}

/// Owned state for the recurring poll.
#[derive(Debug, Default)]
pub struct PollerState {
    phase: Phase,
    readings: Vec<Reading>,
    latest: Option<Reading>,
    error: Option<String>,
    last_applied: u64,
}

impl PollerState {
    /// Create an empty poller state in the `Loading` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The full reading list from the most recent applied fetch.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// The latest reading: the last element of the fetched sequence.
    ///
    /// The feed's ordering is trusted; this is deliberately not the
    /// maximum timestamp.
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// The stored fetch error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply a completed fetch.
    ///
    /// `seq` is the sequence number assigned when the fetch was
    /// dispatched. Completions older than one already applied are
    /// discarded and `false` is returned; the state is untouched.
    ///
    /// Each applied fetch replaces the reading list wholesale:
    /// - success: new list, latest = last element, error cleared
    /// - [`ClientError::Shape`]: empty list, no latest, no error
    /// - any other error: message stored, list and latest cleared
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Reading>, ClientError>) -> bool {
        if seq <= self.last_applied {
            debug!(seq, last_applied = self.last_applied, "discarding stale fetch completion");
            return false;
        }
        self.last_applied = seq;
        self.phase = Phase::Ready;

        match result {
            Ok(readings) => {
                self.latest = readings.last().cloned();
                self.readings = readings;
                self.error = None;
            }
            Err(ClientError::Shape { found }) => {
                debug!(found, "non-array payload, presenting empty state");
                self.readings.clear();
                self.latest = None;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "fetch failed");
                self.error = Some(e.to_string());
                self.readings.clear();
                self.latest = None;
            }
        }
        true
    }

    /// Resolve the presentation policy for the current state.
    ///
    /// An error is shown exclusively; otherwise an absent latest reading
    /// means loading; otherwise render normally.
    pub fn display_state(&self) -> DisplayState<'_> {
        match (&self.error, &self.latest) {
            (Some(e), _) => DisplayState::Error(e),
            (None, None) => DisplayState::Loading,
            (None, Some(_)) => DisplayState::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soilwatch_types::Timestamp;
    use time::macros::datetime;

    fn reading(id: &str) -> Reading {
        Reading {
            device_id: Some(id.to_string()),
            timestamp: Timestamp::from_instant(datetime!(2024-05-15 10:00:00 UTC)),
            ..Reading::default()
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = PollerState::new();
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.display_state(), DisplayState::Loading);
        assert!(state.readings().is_empty());
        assert!(state.latest().is_none());
    }

    #[test]
    fn test_success_replaces_list_and_sets_latest_to_last_element() {
        let mut state = PollerState::new();
        assert!(state.apply(1, Ok(vec![reading("a"), reading("b")])));

        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.readings().len(), 2);
        assert_eq!(state.latest().unwrap().device_id.as_deref(), Some("b"));
        assert_eq!(state.display_state(), DisplayState::Ready);
    }

    #[test]
    fn test_empty_list_means_loading_without_error() {
        let mut state = PollerState::new();
        assert!(state.apply(1, Ok(vec![])));
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.latest().is_none());
        assert_eq!(state.display_state(), DisplayState::Loading);
    }

    #[test]
    fn test_http_error_clears_data_and_sets_error() {
        let mut state = PollerState::new();
        assert!(state.apply(1, Ok(vec![reading("a")])));
        assert!(state.apply(2, Err(ClientError::Http { status: 500 })));

        assert!(state.readings().is_empty());
        assert!(state.latest().is_none());
        assert_eq!(
            state.display_state(),
            DisplayState::Error("HTTP error! Status: 500")
        );
    }

    #[test]
    fn test_shape_error_presents_empty_state_without_error() {
        let mut state = PollerState::new();
        assert!(state.apply(1, Ok(vec![reading("a")])));
        assert!(state.apply(2, Err(ClientError::Shape { found: "object" })));

        assert!(state.readings().is_empty());
        assert!(state.latest().is_none());
        assert_eq!(state.error(), None);
        assert_eq!(state.display_state(), DisplayState::Loading);
    }

    #[test]
    fn test_error_is_cleared_by_next_success() {
        let mut state = PollerState::new();
        assert!(state.apply(1, Err(ClientError::Http { status: 503 })));
        assert!(state.apply(2, Ok(vec![reading("a")])));
        assert_eq!(state.error(), None);
        assert_eq!(state.display_state(), DisplayState::Ready);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = PollerState::new();
        // Tick 2 completes before the slower tick 1.
        assert!(state.apply(2, Ok(vec![reading("newer")])));
        assert!(!state.apply(1, Ok(vec![reading("older")])));

        assert_eq!(state.latest().unwrap().device_id.as_deref(), Some("newer"));

        // A duplicate of an applied sequence is also ignored.
        assert!(!state.apply(2, Err(ClientError::Http { status: 500 })));
        assert_eq!(state.error(), None);
    }
}
