//! Line timetables as fixed-width text.
//!
//! A TfL timetable response is turned into a [`TimetableModel`] (ordered
//! stops, per-interval-group offsets, the journeys of one schedule) and then
//! rendered as a grid with one row per stop and one column per train.

mod arrival;
mod error;
mod fetch;
mod model;
mod render;

pub use arrival::{arrival, arrival_time, lenient_int};
pub use error::TimetableError;
pub use fetch::fetch_timetable;
pub use model::{IntervalOffsets, Journey, Stop, TimetableModel};
pub use render::{
    Grid, MISSING_STOP_MARKER, TRAIN_COLUMN_WIDTH, TextRenderer, UNRESOLVED_MARKER, truncate_name,
};

use crate::tfl::TimetableResponse;

/// Build and render a timetable response in one step.
///
/// `max_journeys` of 0 renders every journey.
pub fn render(
    response: &TimetableResponse,
    max_journeys: usize,
    station_width: usize,
) -> Result<String, TimetableError> {
    let model = TimetableModel::build(response)?;
    Ok(TextRenderer::new(max_journeys, station_width).render(&model))
}
