//! Building a renderable timetable from a TfL response.

use std::collections::{HashMap, HashSet};

use crate::tfl::{KnownJourney, TimetableResponse};

use super::error::TimetableError;

/// Appended to names that only appear in the station list.
const STATION_NAME_SUFFIX: &str = " [S]";

/// A row of the timetable grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: String,
    pub name: String,
}

/// A departure from the departure stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    pub hour: String,
    pub minute: String,
    pub interval_id: i32,
}

impl From<&KnownJourney> for Journey {
    fn from(j: &KnownJourney) -> Self {
        Self {
            hour: j.hour.clone(),
            minute: j.minute.clone(),
            interval_id: j.interval_id,
        }
    }
}

/// Minutes from the departure stop to each stop of one interval group.
pub type IntervalOffsets = HashMap<String, f64>;

/// A timetable ready to render: ordered stops, per-group offsets and the
/// journeys of one schedule.
///
/// Built once per request and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    line_name: String,
    schedule_name: String,
    departure_stop_id: String,
    stops: Vec<Stop>,
    intervals: HashMap<i32, IntervalOffsets>,
    /// Id of the route's first interval group, used when a journey's own
    /// group is missing.
    fallback_interval_id: Option<i32>,
    journeys: Vec<Journey>,
}

impl TimetableModel {
    /// Build the model from a timetable response.
    ///
    /// Renders the first schedule of the first route that has any
    /// schedules. This does not take direction into account.
    ///
    /// Stops are ordered by first appearance while scanning interval
    /// groups in response order, after the departure stop which is always
    /// first. Every group's offsets include the departure stop at 0; an
    /// upstream offset for the departure stop, as on a loop back to its
    /// origin, is replaced with 0.
    pub fn build(response: &TimetableResponse) -> Result<Self, TimetableError> {
        let timetable = response
            .timetable
            .as_ref()
            .ok_or(TimetableError::NoScheduleData)?;

        let (route, schedule) = timetable
            .routes
            .iter()
            .find_map(|r| r.schedules.first().map(|s| (r, s)))
            .ok_or(TimetableError::NoScheduleData)?;

        let names = name_lookup(response);
        let name_of = |id: &str| names.get(id).cloned().unwrap_or_default();

        let departure_id = timetable.departure_stop_id.as_str();
        let mut stops = vec![Stop {
            id: departure_id.to_string(),
            name: name_of(departure_id),
        }];
        let mut seen: HashSet<&str> = HashSet::from([departure_id]);

        let mut intervals = HashMap::with_capacity(route.station_intervals.len());
        for group in &route.station_intervals {
            let mut offsets = IntervalOffsets::with_capacity(group.intervals.len() + 1);

            for interval in &group.intervals {
                offsets.insert(interval.stop_id.clone(), interval.time_to_arrival);
                if seen.insert(interval.stop_id.as_str()) {
                    stops.push(Stop {
                        id: interval.stop_id.clone(),
                        name: name_of(&interval.stop_id),
                    });
                }
            }

            offsets.insert(departure_id.to_string(), 0.0);
            intervals.insert(parse_interval_id(&group.id), offsets);
        }

        let fallback_interval_id = route
            .station_intervals
            .first()
            .map(|g| parse_interval_id(&g.id));

        Ok(Self {
            line_name: response.line_name.clone(),
            schedule_name: schedule.name.clone(),
            departure_stop_id: departure_id.to_string(),
            stops,
            intervals,
            fallback_interval_id,
            journeys: schedule.known_journeys.iter().map(Journey::from).collect(),
        })
    }

    pub fn line_name(&self) -> &str {
        &self.line_name
    }

    pub fn schedule_name(&self) -> &str {
        &self.schedule_name
    }

    pub fn departure_stop_id(&self) -> &str {
        &self.departure_stop_id
    }

    /// Rows in render order; the departure stop is first.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Journeys of the selected schedule, in response order.
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    /// Offsets for an interval group, exactly as given.
    pub fn interval(&self, interval_id: i32) -> Option<&IntervalOffsets> {
        self.intervals.get(&interval_id)
    }

    /// Offsets to use for a journey referencing `interval_id`.
    ///
    /// Falls back to the route's first interval group when the id is not
    /// known; fails only when the route has no interval groups.
    pub fn offsets_for(&self, interval_id: i32) -> Result<&IntervalOffsets, TimetableError> {
        self.interval(interval_id)
            .or_else(|| self.fallback_interval_id.and_then(|id| self.interval(id)))
            .ok_or(TimetableError::UnresolvedInterval { interval_id })
    }
}

/// Stop id → display name. Platform-level `stops` win; ids only present
/// in `stations` get a suffix so the two sources stay distinguishable.
fn name_lookup(response: &TimetableResponse) -> HashMap<String, String> {
    let mut names: HashMap<String, String> = response
        .stops
        .iter()
        .map(|s| (s.id.clone(), s.name.clone()))
        .collect();

    for station in &response.stations {
        names
            .entry(station.id.clone())
            .or_insert_with(|| format!("{}{STATION_NAME_SUFFIX}", station.name));
    }

    names
}

/// Interval group ids are numeric strings; anything else maps to 0.
fn parse_interval_id(id: &str) -> i32 {
    id.trim().parse().unwrap_or(0)
}
