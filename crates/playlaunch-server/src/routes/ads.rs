use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use playlaunch_core::ads::TrackOutcome;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ads: slot snapshot plus presenter countdown.
pub async fn get_ads(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "slot": app.ads.snapshot(),
        "presenter": app.interstitial.status(),
        "unit_id": app.config.ads.unit_id,
    }))
}

/// POST /api/ads/track: record one user action.
pub async fn track_action(State(app): State<AppState>) -> Json<TrackOutcome> {
    Json(app.ads.track_action())
}

/// POST /api/ads/dismiss: close the interstitial once its countdown is over.
pub async fn dismiss_ad(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    app.interstitial.try_dismiss()?;
    Ok(Json(serde_json::json!({
        "dismissed": true,
        "slot": app.ads.snapshot(),
    })))
}

/// GET /api/ads/events: SSE stream emitting `ad` with `show` or `hide`.
pub async fn sse_ad_events(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let rx = app.ads.watch();
    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        msg.ok().map(|event| {
            let data = if event.is_show() { "show" } else { "hide" };
            Ok::<Event, Infallible>(Event::default().event("ad").data(data))
        })
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
