//! Station name → (line, platform) resolution.

use serde::Serialize;
use tracing::{debug, info};

use crate::tfl::TransitApi;

use super::batch::fetch_stop_points;
use super::error::ResolveError;
use super::tree::{first_platform_descendant, is_hub, platform_descendants};

/// A line serving a platform: the unit a timetable query is made from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAttachment {
    pub line_id: String,
    pub stop_point_id: String,
}

/// Resolves free-text station names into the platforms and lines that
/// serve them.
///
/// Holds no state beyond a borrowed API handle; build one per request.
pub struct StopResolver<'a, A> {
    api: &'a A,
}

impl<'a, A: TransitApi> StopResolver<'a, A> {
    /// Create a resolver over the given API.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Find every (line, platform) pair servable from a station.
    ///
    /// 1. Search by name and mode.
    /// 2. Fetch details for every match; hubs are expanded to their
    ///    platform descendants, anything else is kept as-is.
    /// 3. Fetch the platforms again to read their attached lines.
    ///
    /// No match is not an error: the result is simply empty. Pairs are in
    /// traversal order and are not deduplicated.
    pub async fn resolve(
        &self,
        station_name: &str,
        mode: &str,
    ) -> Result<Vec<LineAttachment>, ResolveError> {
        let matches = self.api.search(station_name, mode).await?;
        if matches.is_empty() {
            debug!(station_name, mode, "no stop point matches");
            return Ok(Vec::new());
        }

        let candidate_ids: Vec<String> = matches.into_iter().map(|m| m.id).collect();
        debug!(station_name, candidates = candidate_ids.len(), "searched stop points");

        let details = fetch_stop_points(self.api, candidate_ids).await?;

        let mut platform_ids = Vec::new();
        for sp in &details {
            if is_hub(&sp.id) {
                platform_ids.extend(platform_descendants(&sp.children));
            } else {
                platform_ids.push(sp.id.clone());
            }
        }

        if platform_ids.is_empty() {
            debug!(station_name, "matches have no platforms");
            return Ok(Vec::new());
        }
        debug!(station_name, platforms = platform_ids.len(), "expanded hubs");

        let platforms = fetch_stop_points(self.api, platform_ids).await?;

        let pairs: Vec<LineAttachment> = platforms
            .iter()
            .flat_map(|sp| {
                sp.lines.iter().map(move |line| LineAttachment {
                    line_id: line.id.clone(),
                    stop_point_id: sp.naptan_or_id().to_string(),
                })
            })
            .collect();

        info!(station_name, mode, pairs = pairs.len(), "resolved station");
        Ok(pairs)
    }

    /// Like [`resolve`](Self::resolve), but an empty result is
    /// [`ResolveError::NoStopsFound`].
    pub async fn resolve_required(
        &self,
        station_name: &str,
        mode: &str,
    ) -> Result<Vec<LineAttachment>, ResolveError> {
        let pairs = self.resolve(station_name, mode).await?;
        if pairs.is_empty() {
            return Err(ResolveError::NoStopsFound {
                query: station_name.to_string(),
            });
        }
        Ok(pairs)
    }

    /// Turn a hub identifier into a concrete platform identifier.
    ///
    /// Non-hub identifiers are returned unchanged. A hub with no platform
    /// below it (or one TfL does not know) is also returned unchanged.
    pub async fn resolve_platform(&self, id: &str) -> Result<String, ResolveError> {
        if !is_hub(id) {
            return Ok(id.to_string());
        }

        let points = fetch_stop_points(self.api, vec![id.to_string()]).await?;

        let Some(target) = points
            .iter()
            .find(|sp| sp.id.eq_ignore_ascii_case(id))
            .or_else(|| points.first())
        else {
            return Ok(id.to_string());
        };

        Ok(first_platform_descendant(&target.children).unwrap_or_else(|| id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfl::{LineIdentifier, MockTflClient, SearchMatch, StopPoint};

    fn line(id: &str) -> LineIdentifier {
        LineIdentifier {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    fn platform(id: &str, lines: &[&str]) -> StopPoint {
        StopPoint {
            id: id.to_string(),
            naptan_id: Some(id.to_string()),
            lines: lines.iter().map(|l| line(l)).collect(),
            ..Default::default()
        }
    }

    fn hub(id: &str, children: Vec<StopPoint>) -> StopPoint {
        StopPoint {
            id: id.to_string(),
            children,
            ..Default::default()
        }
    }

    fn search_match(id: &str) -> SearchMatch {
        SearchMatch {
            id: id.to_string(),
            name: id.to_string(),
            modes: vec!["tube".to_string()],
        }
    }

    fn pair(line_id: &str, stop_point_id: &str) -> LineAttachment {
        LineAttachment {
            line_id: line_id.to_string(),
            stop_point_id: stop_point_id.to_string(),
        }
    }

    /// Richmond: a hub whose children include the Underground platform and
    /// a nested hub with a further platform.
    async fn richmond() -> MockTflClient {
        let mock = MockTflClient::new();
        mock.add_search("Richmond", vec![search_match("HUBRMD")]).await;
        mock.add_stop_point(hub(
            "HUBRMD",
            vec![
                StopPoint {
                    id: "940GZZLURMD".into(),
                    ..Default::default()
                },
                hub(
                    "HUBXYZ",
                    vec![StopPoint {
                        id: "940GZZLUXYZ".into(),
                        ..Default::default()
                    }],
                ),
                StopPoint {
                    id: "910GRICHMND".into(),
                    ..Default::default()
                },
            ],
        ))
        .await;
        mock.add_stop_point(platform("940GZZLURMD", &["district"])).await;
        mock.add_stop_point(platform("940GZZLUXYZ", &["district", "london-overground"]))
            .await;
        mock.add_stop_point(hub("HUBAMR", vec![platform("940GZZLUAMS", &["metropolitan"])]))
            .await;
        mock
    }

    #[tokio::test]
    async fn resolves_hub_to_platform_lines() {
        let mock = richmond().await;
        let resolver = StopResolver::new(&mock);

        let pairs = resolver.resolve("Richmond", "tube").await.unwrap();

        assert_eq!(
            pairs,
            vec![
                pair("district", "940GZZLURMD"),
                pair("district", "940GZZLUXYZ"),
                pair("london-overground", "940GZZLUXYZ"),
            ]
        );
    }

    #[tokio::test]
    async fn hub_ids_never_appear_in_output() {
        let mock = richmond().await;
        let pairs = StopResolver::new(&mock)
            .resolve("Richmond", "tube")
            .await
            .unwrap();

        assert!(pairs.iter().all(|p| !p.stop_point_id.starts_with("HUB")));
        assert!(pairs.iter().all(|p| p.stop_point_id.starts_with("940G")));
    }

    #[tokio::test]
    async fn single_ids_are_padded_and_padding_is_dropped() {
        let mock = richmond().await;
        let pairs = StopResolver::new(&mock)
            .resolve("Richmond", "tube")
            .await
            .unwrap();

        // The Amersham sentinel's metropolitan line must not leak through.
        assert!(pairs.iter().all(|p| p.line_id != "metropolitan"));

        let batches = mock.stop_point_batches();
        assert_eq!(batches[0], vec!["HUBRMD".to_string(), "HUBAMR".to_string()]);
        assert!(batches.iter().all(|b| b.len() >= 2));
    }

    #[tokio::test]
    async fn no_match_is_empty_not_error() {
        let mock = richmond().await;
        let resolver = StopResolver::new(&mock);

        let pairs = resolver.resolve("Nowhere", "tube").await.unwrap();
        assert!(pairs.is_empty());
        assert!(mock.stop_point_batches().is_empty());

        let err = resolver.resolve_required("Nowhere", "tube").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoStopsFound { ref query } if query == "Nowhere"));
    }

    #[tokio::test]
    async fn non_hub_match_is_kept_directly() {
        let mock = MockTflClient::new();
        mock.add_search(
            "Amersham",
            vec![search_match("940GZZLUAMS"), search_match("940GZZLUCSM")],
        )
        .await;
        mock.add_stop_point(platform("940GZZLUAMS", &["metropolitan"])).await;
        mock.add_stop_point(platform("940GZZLUCSM", &["metropolitan"])).await;

        let pairs = StopResolver::new(&mock)
            .resolve("Amersham", "tube")
            .await
            .unwrap();

        assert_eq!(
            pairs,
            vec![
                pair("metropolitan", "940GZZLUAMS"),
                pair("metropolitan", "940GZZLUCSM"),
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_pairs_are_preserved() {
        let mock = MockTflClient::new();
        mock.add_search("Twice", vec![search_match("HUBA"), search_match("HUBB")])
            .await;
        mock.add_stop_point(hub("HUBA", vec![platform("940GSHARED", &[])])).await;
        mock.add_stop_point(hub("HUBB", vec![platform("940GSHARED", &[])])).await;
        mock.add_stop_point(platform("940GSHARED", &["jubilee"])).await;

        let pairs = StopResolver::new(&mock)
            .resolve("Twice", "tube")
            .await
            .unwrap();

        assert_eq!(
            pairs,
            vec![pair("jubilee", "940GSHARED"), pair("jubilee", "940GSHARED")]
        );
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        // Search always fails.
        struct Failing;

        impl TransitApi for Failing {
            async fn search(
                &self,
                _query: &str,
                _mode: &str,
            ) -> Result<Vec<SearchMatch>, crate::tfl::TflError> {
                Err(crate::tfl::TflError::RateLimited)
            }

            async fn stop_points(
                &self,
                _ids: &[String],
            ) -> Result<Vec<StopPoint>, crate::tfl::TflError> {
                Ok(vec![])
            }

            async fn timetable(
                &self,
                _query: &crate::tfl::TimetableQuery,
            ) -> Result<crate::tfl::TimetableOutcome, crate::tfl::TflError> {
                Ok(crate::tfl::TimetableOutcome::Empty)
            }
        }

        let err = StopResolver::new(&Failing)
            .resolve("Richmond", "tube")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn resolve_platform_picks_first_descendant() {
        let mock = richmond().await;
        let resolver = StopResolver::new(&mock);

        assert_eq!(resolver.resolve_platform("HUBRMD").await.unwrap(), "940GZZLURMD");
        assert_eq!(
            resolver.resolve_platform("940GZZLURMD").await.unwrap(),
            "940GZZLURMD"
        );
        // Unknown hub: nothing comes back but the sentinel, which is dropped.
        assert_eq!(resolver.resolve_platform("HUBZZZ").await.unwrap(), "HUBZZZ");
    }

    #[tokio::test]
    async fn resolve_platform_for_the_sentinel_hub_itself() {
        let mock = richmond().await;
        let resolver = StopResolver::new(&mock);

        assert_eq!(resolver.resolve_platform("HUBAMR").await.unwrap(), "940GZZLUAMS");
        assert_eq!(
            mock.stop_point_batches().last().unwrap(),
            &vec!["HUBAMR".to_string(), "HUBRMD".to_string()]
        );
    }
}
