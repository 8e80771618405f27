//! Resolver error types.

use crate::tfl::TflError;

/// Errors from resolving a station name to lines and platforms.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The search produced no usable stops
    #[error("no stops found for '{query}'")]
    NoStopsFound { query: String },

    /// TfL could not be reached or answered with an error
    #[error("TfL unavailable: {0}")]
    UpstreamUnavailable(#[from] TflError),
}
