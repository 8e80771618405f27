//! TfL Unified API client.
//!
//! This module provides an HTTP client for the Transport for London API,
//! which serves stop point search, stop point details and line timetables.
//!
//! Key characteristics of the API:
//! - Stops form a tree: hubs (`HUB...`) own stop areas and platforms
//!   (`940G...` for the Underground), which own the attached lines
//! - `StopPoint/{ids}` answers a single id with a bare object instead of
//!   an array
//! - Timetable requests may come back with disambiguation options instead
//!   of a timetable

mod api;
mod client;
mod error;
mod mock;
mod types;

pub use api::{TimetableQuery, TransitApi};
pub use client::{DEFAULT_BASE_URL, TflClient, TflConfig};
pub use error::TflError;
pub use mock::MockTflClient;
pub use types::{
    Disambiguation, DisambiguationOption, Interval, KnownJourney, LineIdentifier, MatchedStop,
    Schedule, SearchMatch, SearchResponse, StationInterval, StopPoint, Timetable,
    TimetableOutcome, TimetableResponse, TimetableRoute,
};
