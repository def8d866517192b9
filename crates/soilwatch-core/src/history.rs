//! The history filter/sort/paginate engine.
//!
//! [`view`] is a pure function of the reading list, the query, the
//! thresholds, and the current instant. It owns no state and is recomputed
//! whenever any input changes; the dataset is bounded by one poll's worth
//! of readings, so full recomputation is cheap and no incremental index is
//! kept.
//!
//! Page state lives in [`HistoryQuery`]: every filter or sort mutation
//! resets the page to 1, and [`HistoryQuery::set_page`] rejects requests
//! outside `[1, total_pages]` rather than clamping.

use time::{Date, Duration, OffsetDateTime, Time};

use soilwatch_types::{HealthStatus, Reading};

use crate::thresholds::HealthThresholds;

/// Fixed number of rows per history page.
pub const PAGE_SIZE: usize = 10;

/// Preset date-range filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    /// No preset bound.
    #[default]
    All,
    /// Midnight of the current day through now.
    Today,
    /// Seven days ago (time of day preserved) through now.
    LastWeek,
    /// First of the current month through now.
    WholeMonth,
}

impl DateRange {
    /// Get the display label for this preset.
    pub fn label(&self) -> &'static str {
        match self {
            DateRange::All => "All",
            DateRange::Today => "Today",
            DateRange::LastWeek => "Last Week",
            DateRange::WholeMonth => "Whole Month",
        }
    }

    /// Cycle to the next preset.
    pub fn next(&self) -> Self {
        match self {
            DateRange::All => DateRange::Today,
            DateRange::Today => DateRange::LastWeek,
            DateRange::LastWeek => DateRange::WholeMonth,
            DateRange::WholeMonth => DateRange::All,
        }
    }

    /// Resolve the preset into an inclusive `[start, end]` instant window.
    pub fn window(&self, now: OffsetDateTime) -> (Option<OffsetDateTime>, Option<OffsetDateTime>) {
        match self {
            DateRange::All => (None, None),
            DateRange::Today => (Some(now.replace_time(Time::MIDNIGHT)), Some(now)),
            DateRange::LastWeek => (Some(now - Duration::days(7)), Some(now)),
            DateRange::WholeMonth => {
                let first = now.replace_day(1).unwrap_or(now);
                (Some(first.replace_time(Time::MIDNIGHT)), Some(now))
            }
        }
    }
}

/// Filter, sort, and page parameters for the history view.
///
/// Fields are private so the page-reset invariant holds: any filter or
/// sort mutation returns the view to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    status: Option<HealthStatus>,
    range: DateRange,
    start_date: Option<Date>,
    end_date: Option<Date>,
    ascending: bool,
    page: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            status: None,
            range: DateRange::All,
            start_date: None,
            end_date: None,
            // Newest first by default, matching the upstream dashboard.
            ascending: false,
            page: 1,
        }
    }
}

impl HistoryQuery {
    /// The health status filter (`None` means All).
    pub fn status(&self) -> Option<HealthStatus> {
        self.status
    }

    /// Set the health status filter.
    pub fn set_status(&mut self, status: Option<HealthStatus>) {
        self.status = status;
        self.page = 1;
    }

    /// Cycle the status filter: All → Excellent → … → Unknown → All.
    pub fn cycle_status(&mut self) {
        let next = match self.status {
            None => Some(HealthStatus::ALL[0]),
            Some(current) => HealthStatus::ALL
                .iter()
                .position(|&s| s == current)
                .and_then(|i| HealthStatus::ALL.get(i + 1))
                .copied(),
        };
        self.set_status(next);
    }

    /// The preset date range.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Set the preset date range.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.page = 1;
    }

    /// Cycle the preset date range.
    pub fn cycle_range(&mut self) {
        self.set_range(self.range.next());
    }

    /// The explicit start date bound (inclusive).
    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Set the explicit start date bound.
    pub fn set_start_date(&mut self, date: Option<Date>) {
        self.start_date = date;
        self.page = 1;
    }

    /// The explicit end date bound (inclusive).
    pub fn end_date(&self) -> Option<Date> {
        self.end_date
    }

    /// Set the explicit end date bound.
    pub fn set_end_date(&mut self, date: Option<Date>) {
        self.end_date = date;
        self.page = 1;
    }

    /// Whether the sort is ascending by timestamp.
    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Flip the sort direction.
    pub fn toggle_sort(&mut self) {
        self.ascending = !self.ascending;
        self.page = 1;
    }

    /// The current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Request a page change.
    ///
    /// Requests outside `[1, total_pages]` are rejected (the current page
    /// is left unchanged) and `false` is returned.
    pub fn set_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page == 0 || page > total_pages {
            return false;
        }
        self.page = page;
        true
    }
}

/// One rendered page of the filtered/sorted history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    /// The rows on the requested page, at most [`PAGE_SIZE`].
    pub rows: Vec<Reading>,
    /// The 1-based page these rows belong to.
    pub page: usize,
    /// Total pages for the filtered set (`ceil(total_rows / PAGE_SIZE)`).
    pub total_pages: usize,
    /// Total rows passing the filters.
    pub total_rows: usize,
}

/// Compute the history page for the given readings and query.
///
/// A reading passes iff its classification matches the status filter (when
/// set) and its parsed timestamp lies within every active bound: the
/// preset window (instant comparison) AND the explicit date bounds
/// (inclusive calendar-day comparison). Readings whose timestamp cannot be
/// parsed pass only when no date bound is active.
///
/// Sorting is a stable total order over parsed timestamps; readings with
/// equal instants keep their feed order in either direction.
pub fn view(
    readings: &[Reading],
    query: &HistoryQuery,
    thresholds: &HealthThresholds,
    now: OffsetDateTime,
) -> HistoryPage {
    let (window_start, window_end) = query.range().window(now);
    let date_bounds_active = window_start.is_some()
        || window_end.is_some()
        || query.start_date().is_some()
        || query.end_date().is_some();

    let mut rows: Vec<&Reading> = readings
        .iter()
        .filter(|reading| {
            if let Some(want) = query.status()
                && thresholds.classify_reading(reading) != want
            {
                return false;
            }

            match reading.timestamp.instant() {
                Some(instant) => {
                    if let Some(start) = window_start
                        && instant < start
                    {
                        return false;
                    }
                    if let Some(end) = window_end
                        && instant > end
                    {
                        return false;
                    }
                    let date = instant.date();
                    if let Some(start) = query.start_date()
                        && date < start
                    {
                        return false;
                    }
                    if let Some(end) = query.end_date()
                        && date > end
                    {
                        return false;
                    }
                    true
                }
                None => !date_bounds_active,
            }
        })
        .collect();

    // Stable sort: equal (or unparseable) timestamps keep feed order.
    rows.sort_by(|a, b| {
        let ord = a.timestamp.instant().cmp(&b.timestamp.instant());
        if query.ascending() { ord } else { ord.reverse() }
    });

    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(PAGE_SIZE);
    let rows = rows
        .into_iter()
        .skip(query.page().saturating_sub(1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    HistoryPage {
        rows,
        page: query.page(),
        total_pages,
        total_rows,
    }
}
