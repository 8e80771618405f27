//! The narrow contract the resolver and timetable fetcher need from TfL.

use std::future::Future;

use super::error::TflError;
use super::types::{SearchMatch, StopPoint, TimetableOutcome};

/// A timetable request: line, origin platform and optional destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableQuery {
    pub line_id: String,
    pub from_stop_point_id: String,
    pub to_stop_point_id: Option<String>,
    /// Extra query parameters, e.g. copied from a disambiguation option.
    pub params: Vec<(String, String)>,
}

impl TimetableQuery {
    /// Create a query from a line and origin platform.
    pub fn new(line_id: impl Into<String>, from_stop_point_id: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            from_stop_point_id: from_stop_point_id.into(),
            to_stop_point_id: None,
            params: Vec::new(),
        }
    }

    /// Restrict the timetable to journeys towards a destination platform.
    pub fn with_destination(mut self, to_stop_point_id: impl Into<String>) -> Self {
        self.to_stop_point_id = Some(to_stop_point_id.into());
        self
    }

    /// Add query parameters. Later values for the same key replace earlier ones.
    pub fn with_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        for (key, value) in params {
            self.params.retain(|(k, _)| k != &key);
            self.params.push((key, value));
        }
        self
    }

    /// Request path relative to the API base URL.
    pub fn path(&self) -> String {
        match &self.to_stop_point_id {
            Some(to) => format!(
                "/Line/{}/Timetable/{}/to/{}",
                self.line_id, self.from_stop_point_id, to
            ),
            None => format!("/Line/{}/Timetable/{}", self.line_id, self.from_stop_point_id),
        }
    }
}

/// Source of stop and timetable data.
///
/// Implemented by [`TflClient`](super::TflClient) for the live API and by
/// [`MockTflClient`](super::MockTflClient) for tests and offline use.
pub trait TransitApi {
    /// Search stops by free-text name, restricted to one transport mode.
    fn search(
        &self,
        query: &str,
        mode: &str,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, TflError>> + Send;

    /// Fetch details for a batch of stop identifiers.
    ///
    /// TfL answers a batch of exactly one id with a bare object rather than
    /// an array, which fails to deserialize here. Callers pad single-id
    /// batches (see [`crate::resolve`]).
    fn stop_points(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<StopPoint>, TflError>> + Send;

    /// Fetch a line timetable.
    fn timetable(
        &self,
        query: &TimetableQuery,
    ) -> impl Future<Output = Result<TimetableOutcome, TflError>> + Send;
}
