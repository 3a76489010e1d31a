use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: the configuration this server was started with.
///
/// Read-only: config is a YAML file under `.playlaunch/`; edit it and restart.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let mut json = serde_json::to_value(app.config.as_ref())?;
    json["ai"]["api_key_present"] = serde_json::Value::Bool(app.gemini.has_api_key());
    Ok(Json(json))
}
