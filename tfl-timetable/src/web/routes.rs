//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::resolve::{ResolveError, StopResolver};
use crate::tfl::{TimetableQuery, TransitApi};
use crate::timetable::{TextRenderer, TimetableError, TimetableModel, fetch_timetable};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router<A>(state: AppState<A>) -> Router
where
    A: TransitApi + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_page::<A>))
        .route("/health", get(health))
        .route("/demo", get(demo::<A>))
        .route("/timetable", get(timetable_page::<A>))
        .route("/api/stops", get(search_stops::<A>))
        .route("/api/timetable", get(timetable_text::<A>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page: search form, plus results when `q` is given.
///
/// Resolver failures are shown in the page rather than as an error status.
async fn index_page<A: TransitApi + Send + Sync>(
    State(state): State<AppState<A>>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Html<String>, AppError> {
    let mode = req.mode.clone().unwrap_or_else(|| state.mode.clone());

    let mut template = IndexTemplate {
        query: req.q.clone().unwrap_or_default(),
        mode: mode.clone(),
        searched: false,
        results: Vec::new(),
        error: None,
    };

    if let Some(query) = req.query() {
        template.searched = true;
        match StopResolver::new(state.tfl.as_ref()).resolve(query, &mode).await {
            Ok(pairs) => template.results = pairs.iter().map(PairView::from_attachment).collect(),
            Err(e) => template.error = Some(e.to_string()),
        }
    }

    render_page(&template)
}

/// Resolve the demo station and redirect to its first timetable.
async fn demo<A: TransitApi + Send + Sync>(
    State(state): State<AppState<A>>,
) -> Result<Response, AppError> {
    let pairs = StopResolver::new(state.tfl.as_ref())
        .resolve_required(&state.demo_station, &state.mode)
        .await?;

    // resolve_required never returns an empty list.
    let Some(first) = pairs.first() else {
        return Err(AppError::NotFound {
            message: format!("No lines or stops found for {}", state.demo_station),
        });
    };

    let location = timetable_href(first);
    info!(station = %state.demo_station, %location, "demo redirect");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Timetable as an HTML page.
async fn timetable_page<A: TransitApi + Send + Sync>(
    State(state): State<AppState<A>>,
    Query(req): Query<TimetableRequest>,
) -> Result<Html<String>, AppError> {
    let rendered = render_timetable(&state, &req).await?;

    render_page(&TimetableTemplate {
        line_id: rendered.line_id,
        stop_point_id: rendered.stop_point_id,
        grid: rendered.text,
    })
}

/// Timetable as plain text.
async fn timetable_text<A: TransitApi + Send + Sync>(
    State(state): State<AppState<A>>,
    Query(req): Query<TimetableRequest>,
) -> Result<String, AppError> {
    Ok(render_timetable(&state, &req).await?.text)
}

/// (line, platform) pairs for a station, as JSON.
async fn search_stops<A: TransitApi + Send + Sync>(
    State(state): State<AppState<A>>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<StopSearchResponse>, AppError> {
    let query = req.query().ok_or_else(|| AppError::BadRequest {
        message: "Missing q".to_string(),
    })?;
    let mode = req.mode.as_deref().unwrap_or(&state.mode);

    let pairs = StopResolver::new(state.tfl.as_ref())
        .resolve_required(query, mode)
        .await?;

    Ok(Json(StopSearchResponse { pairs }))
}

struct RenderedTimetable {
    line_id: String,
    stop_point_id: String,
    text: String,
}

/// Validate a timetable request, fetch it and render the grid.
///
/// Hub ids are accepted for either end and turned into platforms first.
async fn render_timetable<A: TransitApi + Send + Sync>(
    state: &AppState<A>,
    req: &TimetableRequest,
) -> Result<RenderedTimetable, AppError> {
    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let (Some(line_id), Some(stop_point_id)) =
        (non_blank(&req.line_id), non_blank(&req.stop_point_id))
    else {
        return Err(AppError::BadRequest {
            message: "Missing line_id or stop_point_id".to_string(),
        });
    };

    let api = state.tfl.as_ref();
    let resolver = StopResolver::new(api);

    let from = resolver.resolve_platform(&stop_point_id).await?;
    let mut query = TimetableQuery::new(&line_id, from.clone());
    if let Some(to) = non_blank(&req.to_stop_point_id) {
        query = query.with_destination(resolver.resolve_platform(&to).await?);
    }

    let response = fetch_timetable(api, &query).await?;
    let model = TimetableModel::build(&response)?;

    let defaults = TextRenderer::default();
    let renderer = TextRenderer::new(
        req.max_journeys.unwrap_or(defaults.max_journeys),
        req.width.unwrap_or(defaults.station_width),
    );

    Ok(RenderedTimetable {
        line_id,
        stop_point_id: from,
        text: renderer.render(&model),
    })
}

fn render_page(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NoStopsFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            ResolveError::UpstreamUnavailable(_) => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        match e {
            TimetableError::NoScheduleData => AppError::NotFound {
                message: e.to_string(),
            },
            TimetableError::AmbiguousQuery { .. } | TimetableError::UpstreamUnavailable(_) => {
                AppError::BadGateway {
                    message: e.to_string(),
                }
            }
            TimetableError::UnresolvedInterval { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(status = status.as_u16(), %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::tfl::{MockTflClient, SearchResponse, StopPoint, TimetableResponse};

    const SEARCH_RICHMOND: &str = include_str!("../../testdata/search_richmond.json");
    const STOP_POINTS_RICHMOND: &str = include_str!("../../testdata/stop_points_richmond.json");
    const RICHMOND_TUBE: &str = include_str!("../../testdata/stop_point_richmond_tube.json");
    const DISTRICT: &str = include_str!("../../testdata/timetable_district.json");
    const DISAMBIGUATION: &str = include_str!("../../testdata/timetable_disambiguation.json");

    async fn richmond_mock() -> MockTflClient {
        let mock = MockTflClient::new();

        let search: SearchResponse = serde_json::from_str(SEARCH_RICHMOND).unwrap();
        mock.add_search("Richmond", search.matches).await;

        let hubs: Vec<StopPoint> = serde_json::from_str(STOP_POINTS_RICHMOND).unwrap();
        for hub in hubs {
            mock.add_stop_point(hub).await;
        }
        mock.add_stop_point(serde_json::from_str(RICHMOND_TUBE).unwrap())
            .await;

        let district: TimetableResponse = serde_json::from_str(DISTRICT).unwrap();
        mock.add_timetable(&TimetableQuery::new("district", "940GZZLURMD"), district)
            .await;

        mock
    }

    async fn app() -> Router {
        create_router(AppState::new(richmond_mock().await))
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, Response) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health() {
        let (status, response) = send(app().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn index_without_query_shows_form_only() {
        let (status, response) = send(app().await, "/").await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<form"));
        assert!(!html.contains("Results for"));
        assert!(!html.contains("No results found"));
    }

    #[tokio::test]
    async fn index_lists_lines_for_station() {
        let (status, response) = send(app().await, "/?q=Richmond").await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("District Line at Stop 940GZZLURMD"));
        assert!(html.contains("London-Overground Line at Stop 940GZZLURMD"));
    }

    #[tokio::test]
    async fn index_reports_no_results() {
        let (status, response) = send(app().await, "/?q=Nowhere").await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No results found for 'Nowhere'"));
    }

    #[tokio::test]
    async fn demo_redirects_to_first_pair() {
        let (status, response) = send(app().await, "/demo").await;

        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/timetable?line_id=district&stop_point_id=940GZZLURMD"
        );
    }

    #[tokio::test]
    async fn demo_without_pairs_is_not_found() {
        let state = AppState::new(richmond_mock().await).with_demo_station("Nowhere");
        let (status, _) = send(create_router(state), "/demo").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn timetable_page_renders_grid() {
        let (status, response) = send(
            app().await,
            "/timetable?line_id=district&stop_point_id=940GZZLURMD",
        )
        .await;
        let html = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h1>Timetable for 940GZZLURMD</h1>"));
        assert!(html.contains("<pre>"));
        assert!(html.contains("05:21"));
        assert!(html.contains("Train 4"));
    }

    #[tokio::test]
    async fn timetable_accepts_hub_ids() {
        let (status, response) = send(
            app().await,
            "/api/timetable?line_id=district&stop_point_id=HUBRMD&max_journeys=1&width=30",
        )
        .await;
        let text = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(text.starts_with("Timetable for District at 940GZZLURMD\n"));
        assert!(text.contains("Train 1"));
        assert!(!text.contains("Train 2"));
    }

    #[tokio::test]
    async fn plain_text_timetable() {
        let (status, response) = send(
            app().await,
            "/api/timetable?line_id=district&stop_point_id=940GZZLURMD&width=12",
        )
        .await;
        let content_type = response.headers()[header::CONTENT_TYPE].clone();
        let text = body_text(response).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));

        let kew = text
            .lines()
            .find(|l| l.starts_with("Kew Garde..."))
            .unwrap();
        assert_eq!(
            kew.split(" | ").skip(1).map(str::trim_end).collect::<Vec<_>>(),
            vec!["05:23", "05:36", "05:47", "00:07"]
        );
    }

    #[tokio::test]
    async fn missing_parameters_are_bad_request() {
        for uri in [
            "/timetable",
            "/timetable?line_id=district",
            "/api/timetable?stop_point_id=940GZZLURMD",
            "/api/timetable?line_id=&stop_point_id=940GZZLURMD",
            "/api/stops",
        ] {
            let (status, response) = send(app().await, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

            let body: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let (status, _) = send(
            app().await,
            "/api/timetable?line_id=central&stop_point_id=940GZZLUBNK",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn follows_disambiguation() {
        let mock = richmond_mock().await;
        let base = TimetableQuery::new("district", "940GZZLUKWG");
        mock.add_timetable(&base, serde_json::from_str(DISAMBIGUATION).unwrap())
            .await;
        let mut district: TimetableResponse = serde_json::from_str(DISTRICT).unwrap();
        district.line_name = "District inbound".into();
        mock.add_timetable(
            &base.with_params([("direction".to_string(), "inbound".to_string())]),
            district,
        )
        .await;

        let (status, response) = send(
            create_router(AppState::new(mock)),
            "/api/timetable?line_id=district&stop_point_id=940GZZLUKWG",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body_text(response).await.contains("District inbound"));
    }

    #[tokio::test]
    async fn unresolved_disambiguation_is_bad_gateway() {
        let mock = richmond_mock().await;
        mock.add_timetable(
            &TimetableQuery::new("district", "940GZZLUKWG"),
            serde_json::from_str(DISAMBIGUATION).unwrap(),
        )
        .await;

        let (status, response) = send(
            create_router(AppState::new(mock)),
            "/api/timetable?line_id=district&stop_point_id=940GZZLUKWG",
        )
        .await;
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("Towards Upminster"));
    }

    #[tokio::test]
    async fn no_schedule_is_not_found() {
        let mock = richmond_mock().await;
        mock.add_timetable(
            &TimetableQuery::new("district", "940GZZLUKWG"),
            TimetableResponse::default(),
        )
        .await;

        let (status, _) = send(
            create_router(AppState::new(mock)),
            "/timetable?line_id=district&stop_point_id=940GZZLUKWG",
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_stops_returns_pairs() {
        let (status, response) = send(app().await, "/api/stops?q=Richmond&mode=tube").await;
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "pairs": [
                    {"line_id": "district", "stop_point_id": "940GZZLURMD"},
                    {"line_id": "london-overground", "stop_point_id": "940GZZLURMD"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn api_stops_unknown_station_is_not_found() {
        let (status, _) = send(app().await, "/api/stops?q=Nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_status_mapping() {
        let status = |e: AppError| e.into_response().status();

        assert_eq!(
            status(ResolveError::NoStopsFound { query: "x".into() }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(TimetableError::NoScheduleData.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(TimetableError::AmbiguousQuery { options: vec![] }.into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(TimetableError::UpstreamUnavailable(crate::tfl::TflError::RateLimited).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(ResolveError::UpstreamUnavailable(crate::tfl::TflError::Unauthorized).into()),
            StatusCode::BAD_GATEWAY
        );
    }
}
