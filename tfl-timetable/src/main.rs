use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tfl_timetable::config::AppConfig;
use tfl_timetable::tfl::TflClient;
use tfl_timetable::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let client = TflClient::new(config.tfl.clone()).expect("Failed to create TfL client");
    let state = AppState::new(client);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    info!(addr = %config.bind_addr, base_url = %config.tfl.base_url, "TfL timetable server listening");
    info!("  GET  /health         - Health check");
    info!("  GET  /?q=<station>   - Search page");
    info!("  GET  /demo           - Redirect to a Richmond timetable");
    info!("  GET  /timetable      - Timetable page");
    info!("  GET  /api/stops      - (line, platform) pairs as JSON");
    info!("  GET  /api/timetable  - Timetable as plain text");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
