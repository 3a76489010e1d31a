pub mod error;
pub mod interstitial;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use playlaunch_core::config::Config;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router for a fresh session rooted at `root`.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf, config: Config) -> Router {
    router_with_state(state::AppState::new(root, config))
}

/// Build the Router around an existing session state.
pub fn router_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Ads
        .route("/api/ads", get(routes::ads::get_ads))
        .route("/api/ads/track", post(routes::ads::track_action))
        .route("/api/ads/dismiss", post(routes::ads::dismiss_ad))
        .route("/api/ads/events", get(routes::ads::sse_ad_events))
        // Navigation
        .route(
            "/api/navigate",
            get(routes::navigate::current_step).post(routes::navigate::navigate),
        )
        // Checklist
        .route("/api/checklist", get(routes::checklist::get_checklist))
        .route(
            "/api/checklist/{id}/toggle",
            post(routes::checklist::toggle_item),
        )
        .route(
            "/api/checklist/reset",
            post(routes::checklist::reset_checklist),
        )
        // Rank
        .route("/api/rank/{percent}", get(routes::rank::get_rank))
        // Studio
        .route("/api/studio/analysis", post(routes::studio::analyze_idea))
        .route("/api/studio/listing", post(routes::studio::generate_listing))
        .route("/api/studio/policy", post(routes::studio::generate_policy))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the playlaunch API server.
pub async fn serve(
    root: PathBuf,
    config: Config,
    port: u16,
    open_browser: bool,
) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, config, listener, open_browser).await
}

/// Start the server on a pre-bound listener.
///
/// Lets the caller read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    config: Config,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root, config);

    tracing::info!("playlaunch server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/checklist");
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
