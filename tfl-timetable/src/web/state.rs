//! Application state for the web layer.

use std::sync::Arc;

use crate::tfl::TflClient;

/// Mode used when a request does not name one.
pub const DEFAULT_MODE: &str = "tube";

/// Station `/demo` resolves.
pub const DEFAULT_DEMO_STATION: &str = "Richmond";

/// Shared application state.
///
/// Built once at start-up and never mutated; handlers only read it.
pub struct AppState<A = TflClient> {
    /// TfL API client
    pub tfl: Arc<A>,

    /// Default transport mode for searches
    pub mode: String,

    /// Station resolved by `/demo`
    pub demo_station: String,
}

// Manual impl: cloning the state must not require `A: Clone`.
impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            tfl: Arc::clone(&self.tfl),
            mode: self.mode.clone(),
            demo_station: self.demo_station.clone(),
        }
    }
}

impl<A> AppState<A> {
    /// Create a new app state with the default mode and demo station.
    pub fn new(tfl: A) -> Self {
        Self {
            tfl: Arc::new(tfl),
            mode: DEFAULT_MODE.to_string(),
            demo_station: DEFAULT_DEMO_STATION.to_string(),
        }
    }

    /// Change the station `/demo` resolves.
    pub fn with_demo_station(mut self, station: impl Into<String>) -> Self {
        self.demo_station = station.into();
        self
    }
}
