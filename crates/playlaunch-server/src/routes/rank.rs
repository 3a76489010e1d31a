use axum::extract::Path;
use axum::Json;
use playlaunch_core::progress::{next_threshold, select_tier};
use playlaunch_core::LaunchError;

use crate::error::AppError;

/// GET /api/rank/{percent}: tier and next threshold for any percentage.
pub async fn get_rank(Path(percent): Path<u32>) -> Result<Json<serde_json::Value>, AppError> {
    let pct = u8::try_from(percent)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or(LaunchError::InvalidPercent(percent))?;
    let tier = select_tier(pct);

    Ok(Json(serde_json::json!({
        "percent": pct,
        "tier": tier,
        "title": tier.title(),
        "next_threshold": next_threshold(pct),
    })))
}
