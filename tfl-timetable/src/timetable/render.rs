//! Fixed-width text rendering of a timetable model.
//!
//! One row per stop, one column per train:
//!
//! ```text
//! Timetable for District at 940GZZLURMD
//!
//! Schedule: Monday - Friday
//! Station              | Train 1    | Train 2
//! --------------------------------------------------
//! Richmond Undergro... | 05:21      | 05:33
//! Kew Gardens Under... | 05:23      | ---
//! ```

use std::fmt;

use super::arrival::arrival_time;
use super::model::{Journey, Stop, TimetableModel};

/// Width of every train column.
pub const TRAIN_COLUMN_WIDTH: usize = 10;

/// Shown when a journey's interval group does not stop at a station.
pub const MISSING_STOP_MARKER: &str = "---";

/// Shown when a journey's interval group cannot be resolved at all.
pub const UNRESOLVED_MARKER: &str = "err";

const ELLIPSIS: &str = "...";
const COLUMN_SEPARATOR: &str = " | ";

/// Text renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    /// Journeys beyond this many are dropped. 0 means no limit.
    pub max_journeys: usize,
    /// Width of the station name column.
    pub station_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            max_journeys: 200,
            station_width: 50,
        }
    }
}

impl TextRenderer {
    pub fn new(max_journeys: usize, station_width: usize) -> Self {
        Self {
            max_journeys,
            station_width,
        }
    }

    /// Render the model's own journeys.
    pub fn render(&self, model: &TimetableModel) -> String {
        self.render_journeys(model, model.journeys())
    }

    /// Render `journeys` against the model's stops and interval groups.
    pub fn render_journeys(&self, model: &TimetableModel, journeys: &[Journey]) -> String {
        self.grid(model, journeys).to_string()
    }

    /// A displayable grid, truncated to `max_journeys`.
    pub fn grid<'a>(&self, model: &'a TimetableModel, journeys: &'a [Journey]) -> Grid<'a> {
        let journeys = if self.max_journeys > 0 && journeys.len() > self.max_journeys {
            &journeys[..self.max_journeys]
        } else {
            journeys
        };

        Grid {
            model,
            journeys,
            station_width: self.station_width,
        }
    }
}

/// A timetable grid ready to be written out.
pub struct Grid<'a> {
    model: &'a TimetableModel,
    journeys: &'a [Journey],
    station_width: usize,
}

impl Grid<'_> {
    /// Text of one cell.
    fn cell(&self, stop: &Stop, journey: &Journey) -> String {
        match self.model.offsets_for(journey.interval_id) {
            Ok(offsets) => match offsets.get(&stop.id) {
                Some(offset) => arrival_time(&journey.hour, &journey.minute, *offset),
                None => MISSING_STOP_MARKER.to_string(),
            },
            Err(_) => UNRESOLVED_MARKER.to_string(),
        }
    }

    fn row_width(&self) -> usize {
        self.station_width + self.journeys.len() * (TRAIN_COLUMN_WIDTH + COLUMN_SEPARATOR.len())
    }
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.station_width;

        writeln!(
            f,
            "Timetable for {} at {}",
            self.model.line_name(),
            self.model.departure_stop_id()
        )?;
        writeln!(f)?;
        writeln!(f, "Schedule: {}", self.model.schedule_name())?;

        write!(f, "{:<width$}", "Station")?;
        for n in 1..=self.journeys.len() {
            write!(
                f,
                "{COLUMN_SEPARATOR}{:<TRAIN_COLUMN_WIDTH$}",
                format!("Train {n}")
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(self.row_width()))?;

        for stop in self.model.stops() {
            write!(f, "{:<width$}", truncate_name(&stop.name, width))?;
            for journey in self.journeys {
                write!(
                    f,
                    "{COLUMN_SEPARATOR}{:<TRAIN_COLUMN_WIDTH$}",
                    self.cell(stop, journey)
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Shorten `name` to `width` characters, ending in `...` when cut.
pub fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }

    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = name.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
