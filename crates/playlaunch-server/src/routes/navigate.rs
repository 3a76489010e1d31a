use axum::extract::State;
use axum::Json;
use playlaunch_core::types::AppStep;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct NavigateBody {
    pub step: String,
}

/// POST /api/navigate: switch tool tab. Every switch counts as one action.
pub async fn navigate(
    State(app): State<AppState>,
    Json(body): Json<NavigateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let step: AppStep = body.step.parse()?;
    let outcome = app.ads.track_action();
    let previous = std::mem::replace(&mut *app.step.write().await, step);
    tracing::debug!(from = %previous, to = %step, "navigate");

    Ok(Json(serde_json::json!({
        "step": step,
        "previous": previous,
        "ad": outcome,
    })))
}

/// GET /api/navigate: current tool tab.
pub async fn current_step(State(app): State<AppState>) -> Json<serde_json::Value> {
    let step = *app.step.read().await;
    Json(serde_json::json!({ "step": step }))
}
