//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::resolve::LineAttachment;

/// Station search, for the index page and `/api/stops`.
#[derive(Debug, Default, Deserialize)]
pub struct StopSearchRequest {
    /// Free-text station name
    pub q: Option<String>,

    /// Transport mode (defaults to the server's mode, normally "tube")
    pub mode: Option<String>,
}

impl StopSearchRequest {
    /// The query, if present and not blank.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Response for `/api/stops`.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub pairs: Vec<LineAttachment>,
}

/// Timetable request, for `/timetable` and `/api/timetable`.
///
/// Every field is optional so a missing one is reported as a 400 with a
/// useful message rather than a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TimetableRequest {
    /// TfL line id (e.g., "district")
    pub line_id: Option<String>,

    /// Origin platform or hub id
    pub stop_point_id: Option<String>,

    /// Optional destination platform or hub id
    pub to_stop_point_id: Option<String>,

    /// Maximum number of trains to show (0 = all)
    pub max_journeys: Option<usize>,

    /// Width of the station column
    pub width: Option<usize>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
