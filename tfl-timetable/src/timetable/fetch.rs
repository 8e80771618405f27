//! Fetching a timetable, following one round of disambiguation.

use reqwest::Url;
use tracing::{debug, warn};

use crate::tfl::{DisambiguationOption, TimetableOutcome, TimetableQuery, TimetableResponse, TransitApi};

use super::error::TimetableError;

/// Option URIs are usually relative; resolve them against any absolute base.
const URI_BASE: &str = "https://api.tfl.gov.uk/";

/// Query parameter the client adds itself.
const APP_KEY_PARAM: &str = "app_key";

/// Fetch a timetable.
///
/// When TfL answers with disambiguation options, the first option's query
/// parameters are copied onto `query` and the request is made once more.
/// Still ambiguous after that is [`TimetableError::AmbiguousQuery`].
pub async fn fetch_timetable<A: TransitApi>(
    api: &A,
    query: &TimetableQuery,
) -> Result<TimetableResponse, TimetableError> {
    let options = match api.timetable(query).await? {
        TimetableOutcome::Timetable(response) => return Ok(*response),
        TimetableOutcome::Empty => return Err(TimetableError::NoScheduleData),
        TimetableOutcome::Disambiguation(options) => options,
    };

    let Some(first) = options.first() else {
        return Err(TimetableError::NoScheduleData);
    };
    let Some(params) = option_params(first) else {
        warn!(uri = %first.uri, "unparseable disambiguation uri");
        return Err(ambiguous(&options));
    };

    debug!(
        line_id = %query.line_id,
        option = %first.description,
        "following first disambiguation option"
    );
    let followed = query.clone().with_params(params);

    match api.timetable(&followed).await? {
        TimetableOutcome::Timetable(response) => Ok(*response),
        TimetableOutcome::Empty => Err(TimetableError::NoScheduleData),
        TimetableOutcome::Disambiguation(options) => Err(ambiguous(&options)),
    }
}

/// Query parameters of an option's URI, minus the API key.
fn option_params(option: &DisambiguationOption) -> Option<Vec<(String, String)>> {
    let base = Url::parse(URI_BASE).ok()?;
    let url = base.join(option.uri.trim()).ok()?;

    Some(
        url.query_pairs()
            .filter(|(k, _)| k != APP_KEY_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
    )
}

fn ambiguous(options: &[DisambiguationOption]) -> TimetableError {
    TimetableError::AmbiguousQuery {
        options: options
            .iter()
            .map(|o| {
                if o.description.is_empty() {
                    o.uri.clone()
                } else {
                    o.description.clone()
                }
            })
            .collect(),
    }
}
