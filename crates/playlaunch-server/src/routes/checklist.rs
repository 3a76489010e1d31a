use axum::extract::{Path, State};
use axum::Json;
use playlaunch_core::checklist::Checklist;

use crate::error::AppError;
use crate::state::AppState;

fn checklist_json(checklist: &Checklist) -> serde_json::Value {
    serde_json::json!({
        "items": checklist.items,
        "updated_at": checklist.updated_at,
        "progress": checklist.progress(),
    })
}

/// GET /api/checklist: items plus the derived rank.
pub async fn get_checklist(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let checklist = Checklist::load(&root)?;
        Ok::<_, playlaunch_core::LaunchError>(checklist_json(&checklist))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/checklist/{id}/toggle: flip one item.
pub async fn toggle_item(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.checklist_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut checklist = Checklist::load(&root)?;
        let completed = checklist.toggle(&id)?;
        checklist.save(&root)?;

        let mut json = checklist_json(&checklist);
        json["toggled"] = serde_json::json!({ "id": id, "completed": completed });
        Ok::<_, playlaunch_core::LaunchError>(json)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/checklist/reset: clear every item.
pub async fn reset_checklist(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = app.checklist_lock.lock().await;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut checklist = Checklist::load(&root)?;
        checklist.reset();
        checklist.save(&root)?;
        Ok::<_, playlaunch_core::LaunchError>(checklist_json(&checklist))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
