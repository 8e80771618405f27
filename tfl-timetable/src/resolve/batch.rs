//! Batch stop point fetches that work around the single-id quirk.
//!
//! `StopPoint/{ids}` returns a bare object when exactly one id is
//! requested. Padding the batch with a second, unrelated hub forces an
//! array; the padding's result is then dropped again by identity.

use tracing::trace;

use crate::tfl::{StopPoint, TflError, TransitApi};

/// Hub used to pad single-id batches (Amersham).
pub const SENTINEL_ID: &str = "HUBAMR";

/// Used instead of [`SENTINEL_ID`] when the real id is Amersham itself (Richmond).
pub const ALTERNATE_SENTINEL_ID: &str = "HUBRMD";

/// Pad a one-element id list with a sentinel that differs from its only id.
///
/// Returns the sentinel appended, if any.
pub fn pad_singleton(ids: &mut Vec<String>) -> Option<String> {
    let [only] = ids.as_slice() else {
        return None;
    };

    let sentinel = if only == SENTINEL_ID {
        ALTERNATE_SENTINEL_ID
    } else {
        SENTINEL_ID
    };
    ids.push(sentinel.to_string());
    Some(sentinel.to_string())
}

/// Fetch stop point details for `ids`, padding single-id batches.
///
/// Results for the padding sentinel are removed before returning.
pub async fn fetch_stop_points<A: TransitApi>(
    api: &A,
    mut ids: Vec<String>,
) -> Result<Vec<StopPoint>, TflError> {
    let sentinel = pad_singleton(&mut ids);

    let mut points = api.stop_points(&ids).await?;

    if let Some(sentinel) = sentinel {
        points.retain(|sp| {
            let keep = sp.id != sentinel;
            if !keep {
                trace!(%sentinel, "dropping padding stop point");
            }
            keep
        });
    }

    Ok(points)
}
