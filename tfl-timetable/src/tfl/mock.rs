//! Mock TfL client for testing without API access.
//!
//! Serves search results, stop points and timetables from memory, either
//! registered directly or loaded from a directory of JSON fixtures. It
//! reproduces the single-id quirk of `StopPoint/{ids}` so resolver code
//! gets exercised the same way the live API exercises it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use super::api::{TimetableQuery, TransitApi};
use super::error::TflError;
use super::types::{SearchMatch, SearchResponse, StopPoint, TimetableOutcome, TimetableResponse};

#[derive(Default)]
struct MockData {
    /// Keyed by lowercase query.
    searches: HashMap<String, Vec<SearchMatch>>,
    stop_points: HashMap<String, StopPoint>,
    /// Keyed by `TimetableQuery::path()`.
    timetables: HashMap<String, Vec<MockTimetable>>,
}

struct MockTimetable {
    params: Vec<(String, String)>,
    response: TimetableResponse,
}

/// Mock TfL client that serves in-memory data.
#[derive(Clone, Default)]
pub struct MockTflClient {
    data: Arc<RwLock<MockData>>,
    stop_point_batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockTflClient {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Recognised files:
    /// - `search/{query}.json`: a `SearchResponse`
    /// - `stop_points/*.json`: a single stop point or an array of them
    /// - `timetables/{line}__{from}.json`: a `TimetableResponse`
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TflError> {
        let dir = dir.as_ref();
        let mut data = MockData::default();

        for (stem, json) in read_json_files(&dir.join("search"))? {
            let response: SearchResponse = parse_fixture(&stem, &json)?;
            data.searches.insert(stem.to_lowercase(), response.matches);
        }

        for (stem, json) in read_json_files(&dir.join("stop_points"))? {
            let value: serde_json::Value = parse_fixture(&stem, &json)?;
            let points: Vec<StopPoint> = if value.is_array() {
                parse_fixture(&stem, &json)?
            } else {
                vec![parse_fixture(&stem, &json)?]
            };
            for sp in points {
                data.stop_points.insert(sp.id.clone(), sp);
            }
        }

        for (stem, json) in read_json_files(&dir.join("timetables"))? {
            let Some((line, from)) = stem.split_once("__") else {
                return Err(fixture_error(format!(
                    "timetable fixture {stem} is not named {{line}}__{{from}}"
                )));
            };
            let response: TimetableResponse = parse_fixture(&stem, &json)?;
            let query = TimetableQuery::new(line, from);
            data.timetables
                .entry(query.path())
                .or_default()
                .push(MockTimetable {
                    params: Vec::new(),
                    response,
                });
        }

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            stop_point_batches: Arc::default(),
        })
    }

    /// Register search results for a query (matched case-insensitively).
    pub async fn add_search(&self, query: &str, matches: Vec<SearchMatch>) {
        let mut data = self.data.write().await;
        data.searches.insert(query.to_lowercase(), matches);
    }

    /// Register a stop point, served by id.
    pub async fn add_stop_point(&self, stop_point: StopPoint) {
        let mut data = self.data.write().await;
        data.stop_points.insert(stop_point.id.clone(), stop_point);
    }

    /// Register a timetable response for a query.
    ///
    /// A request matches when its path matches and it carries every one of
    /// the query's params. The most specific registration wins.
    pub async fn add_timetable(&self, query: &TimetableQuery, response: TimetableResponse) {
        let mut data = self.data.write().await;
        data.timetables
            .entry(query.path())
            .or_default()
            .push(MockTimetable {
                params: query.params.clone(),
                response,
            });
    }

    /// Every id batch passed to `stop_points`, in call order.
    pub fn stop_point_batches(&self) -> Vec<Vec<String>> {
        self.stop_point_batches
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default()
    }
}

impl TransitApi for MockTflClient {
    async fn search(&self, query: &str, _mode: &str) -> Result<Vec<SearchMatch>, TflError> {
        let data = self.data.read().await;
        Ok(data
            .searches
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn stop_points(&self, ids: &[String]) -> Result<Vec<StopPoint>, TflError> {
        if let Ok(mut batches) = self.stop_point_batches.lock() {
            batches.push(ids.to_vec());
        }

        // The live API answers a single id with a bare object.
        if ids.len() == 1 {
            return Err(TflError::Json {
                message: "invalid type: map, expected a sequence".to_string(),
                body: None,
            });
        }

        let data = self.data.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| data.stop_points.get(id).cloned())
            .collect())
    }

    async fn timetable(&self, query: &TimetableQuery) -> Result<TimetableOutcome, TflError> {
        let data = self.data.read().await;
        let candidates = data.timetables.get(&query.path());

        let best = candidates.and_then(|entries| {
            entries
                .iter()
                .filter(|e| e.params.iter().all(|p| query.params.contains(p)))
                .max_by_key(|e| e.params.len())
        });

        match best {
            Some(entry) => Ok(TimetableOutcome::from(entry.response.clone())),
            None => Err(TflError::Api {
                status: 404,
                message: format!("no mock timetable for {}", query.path()),
            }),
        }
    }
}

/// Read every `.json` file in a directory as (file stem, contents).
///
/// A missing directory yields nothing.
fn read_json_files(dir: &Path) -> Result<Vec<(String, String)>, TflError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| fixture_error(format!("failed to read {dir:?}: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| fixture_error(format!("failed to read entry: {e}")))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| fixture_error(format!("invalid filename: {path:?}")))?
            .to_string();
        let json = std::fs::read_to_string(&path)
            .map_err(|e| fixture_error(format!("failed to read {path:?}: {e}")))?;
        files.push((stem, json));
    }

    files.sort();
    Ok(files)
}

fn parse_fixture<T: serde::de::DeserializeOwned>(name: &str, json: &str) -> Result<T, TflError> {
    serde_json::from_str(json).map_err(|e| fixture_error(format!("failed to parse {name}: {e}")))
}

fn fixture_error(message: String) -> TflError {
    TflError::Api { status: 0, message }
}
