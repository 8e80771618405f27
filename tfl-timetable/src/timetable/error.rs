//! Timetable error types.

use crate::tfl::TflError;

/// Errors from fetching or modelling a timetable.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// No route in the response has a schedule
    #[error("no schedule data in timetable response")]
    NoScheduleData,

    /// TfL asked us to choose between more specific queries
    #[error("ambiguous timetable query; options: {}", .options.join(", "))]
    AmbiguousQuery { options: Vec<String> },

    /// A journey's interval group is missing and there is nothing to fall back to
    #[error("unresolved interval group {interval_id}")]
    UnresolvedInterval { interval_id: i32 },

    /// TfL could not be reached or answered with an error
    #[error("TfL unavailable: {0}")]
    UpstreamUnavailable(#[from] TflError),
}
