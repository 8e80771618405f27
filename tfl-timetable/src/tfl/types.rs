//! TfL Unified API response DTOs.
//!
//! These types map directly to the JSON the TfL API returns. Collections
//! default to empty because TfL omits fields rather than sending empty
//! arrays in many cases (leaf stop points have no `children`, hubs have no
//! `lines`, and so on).

use serde::Deserialize;

/// Response from `StopPoint/Search/{query}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The query string as TfL understood it.
    #[serde(default)]
    pub query: Option<String>,

    /// Total number of matches.
    #[serde(default)]
    pub total: Option<u32>,

    /// Candidate stops, best match first.
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// A single search candidate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// Stop identifier (a hub like `HUBRMD` or a NaPTAN id like `940GZZLURMD`).
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub modes: Vec<String>,
}

/// A stop point from `StopPoint/{ids}`.
///
/// Hubs carry their platforms (and sometimes further hubs) as `children`;
/// platforms carry the `lines` that serve them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPoint {
    #[serde(default)]
    pub id: String,

    /// NaPTAN identifier. Absent on some hub records.
    #[serde(default)]
    pub naptan_id: Option<String>,

    #[serde(default)]
    pub common_name: String,

    #[serde(default)]
    pub stop_type: Option<String>,

    #[serde(default)]
    pub modes: Vec<String>,

    /// Lines attached to this stop point.
    #[serde(default)]
    pub lines: Vec<LineIdentifier>,

    /// Nested stop points (platforms, entrances, sub-hubs).
    #[serde(default)]
    pub children: Vec<StopPoint>,
}

impl StopPoint {
    /// The identifier to report for this stop: NaPTAN id when present, else `id`.
    pub fn naptan_or_id(&self) -> &str {
        self.naptan_id
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

/// A line reference attached to a stop point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineIdentifier {
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// Response from `Line/{id}/Timetable/{from}[/to/{to}]`.
///
/// TfL returns either a `timetable` or a `disambiguation` block; use
/// [`TimetableOutcome`] to get a value that says which.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    #[serde(default)]
    pub line_id: String,

    #[serde(default)]
    pub line_name: String,

    #[serde(default)]
    pub direction: Option<String>,

    /// Station-level names (stop areas, hubs).
    #[serde(default)]
    pub stations: Vec<MatchedStop>,

    /// Platform-level names. Preferred over `stations` for display.
    #[serde(default)]
    pub stops: Vec<MatchedStop>,

    #[serde(default)]
    pub timetable: Option<Timetable>,

    #[serde(default)]
    pub disambiguation: Option<Disambiguation>,

    #[serde(default)]
    pub status_error_message: Option<String>,
}

/// A named stop referenced by a timetable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedStop {
    pub id: String,

    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    #[serde(default)]
    pub departure_stop_id: String,

    #[serde(default)]
    pub routes: Vec<TimetableRoute>,
}

/// One route pattern of a line, with its stopping patterns and schedules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRoute {
    #[serde(default)]
    pub station_intervals: Vec<StationInterval>,

    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// A stopping pattern: minutes from the departure stop to each later stop.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationInterval {
    /// Numeric id sent as a string, referenced by `KnownJourney::interval_id`.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub intervals: Vec<Interval>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub stop_id: String,

    /// Minutes after departure. TfL sends fractional values.
    #[serde(default)]
    pub time_to_arrival: f64,
}

/// A named schedule (e.g. "Monday - Friday") and its departures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub known_journeys: Vec<KnownJourney>,
}

/// A single departure from the departure stop.
///
/// Hour and minute arrive as strings (`"10"`, `"05"`); TfL uses hours past
/// 23 for after-midnight running on some lines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownJourney {
    #[serde(default)]
    pub hour: String,

    #[serde(default)]
    pub minute: String,

    #[serde(default)]
    pub interval_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disambiguation {
    #[serde(default)]
    pub disambiguation_options: Vec<DisambiguationOption>,
}

/// An alternative, more specific query offered by TfL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisambiguationOption {
    #[serde(default)]
    pub description: String,

    /// Relative URI of the more specific request, e.g.
    /// `/Line/district/Timetable/940GZZLURMD?direction=inbound`.
    #[serde(default)]
    pub uri: String,
}

/// What a timetable request actually produced.
#[derive(Debug, Clone)]
pub enum TimetableOutcome {
    /// A timetable is present.
    Timetable(Box<TimetableResponse>),

    /// No timetable; TfL offered these more specific queries instead.
    Disambiguation(Vec<DisambiguationOption>),

    /// Neither a timetable nor any options.
    Empty,
}

impl From<TimetableResponse> for TimetableOutcome {
    fn from(response: TimetableResponse) -> Self {
        if response.timetable.is_some() {
            return TimetableOutcome::Timetable(Box::new(response));
        }

        match response.disambiguation {
            Some(d) if !d.disambiguation_options.is_empty() => {
                TimetableOutcome::Disambiguation(d.disambiguation_options)
            }
            _ => TimetableOutcome::Empty,
        }
    }
}
