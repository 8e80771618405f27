//! Askama templates for the web frontend.

use askama::Template;
use reqwest::Url;

use crate::resolve::LineAttachment;

/// Home page: search form and, after a search, its results.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub query: String,
    pub mode: String,
    /// Whether a search was made (distinguishes "no query" from "no results")
    pub searched: bool,
    pub results: Vec<PairView>,
    pub error: Option<String>,
}

/// A rendered timetable.
#[derive(Template)]
#[template(path = "timetable.html")]
pub struct TimetableTemplate {
    pub line_id: String,
    pub stop_point_id: String,
    pub grid: String,
}

/// One (line, platform) search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairView {
    pub label: String,
    pub href: String,
}

impl PairView {
    pub fn from_attachment(pair: &LineAttachment) -> Self {
        Self {
            label: format!(
                "{} Line at Stop {}",
                title_case(&pair.line_id),
                pair.stop_point_id
            ),
            href: timetable_href(pair),
        }
    }
}

/// Only the path and query of this are used.
const TIMETABLE_URL: &str = "http://localhost/timetable";

/// Link to the timetable page for a pair, with the ids percent-encoded.
pub fn timetable_href(pair: &LineAttachment) -> String {
    let params = [
        ("line_id", pair.line_id.as_str()),
        ("stop_point_id", pair.stop_point_id.as_str()),
    ];
    match Url::parse_with_params(TIMETABLE_URL, &params) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => "/timetable".to_string(),
    }
}

/// Capitalise the first letter of every word; `-` and spaces separate words.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}
