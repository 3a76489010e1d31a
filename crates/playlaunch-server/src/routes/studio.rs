use axum::extract::State;
use axum::Json;
use playlaunch_core::studio::{self, AppCategory, StoreListing};
use playlaunch_core::types::Language;
use playlaunch_core::LaunchError;

use crate::error::AppError;
use crate::state::AppState;

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Idea analysis
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct AnalysisBody {
    pub concept: String,
    #[serde(default)]
    pub language: Option<Language>,
}

/// POST /api/studio/analysis: market viability check in Markdown.
pub async fn analyze_idea(
    State(app): State<AppState>,
    Json(body): Json<AnalysisBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let concept = required("concept", &body.concept)?;
    let lang = body.language.unwrap_or(app.config.language);
    let prompt = studio::idea_analysis_prompt(concept, lang);
    let markdown = app.gemini.generate_text(&prompt).await?;
    Ok(Json(serde_json::json!({ "markdown": markdown })))
}

// ---------------------------------------------------------------------------
// Store listing
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct ListingBody {
    pub app_name: String,
    pub concept: String,
    /// Free-form language name passed through to the model ("English",
    /// "Turkish", "German", ...). Defaults to the configured UI language.
    #[serde(default)]
    pub target_language: Option<String>,
}

/// POST /api/studio/listing: title, descriptions and keywords as JSON.
pub async fn generate_listing(
    State(app): State<AppState>,
    Json(body): Json<ListingBody>,
) -> Result<Json<StoreListing>, AppError> {
    let app_name = required("app_name", &body.app_name)?;
    let concept = required("concept", &body.concept)?;
    let target = body
        .target_language
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(app.config.language.name());

    let prompt = studio::store_listing_prompt(app_name, concept, target);
    let raw = app.gemini.generate_json(&prompt).await?;
    let listing = studio::parse_store_listing(&raw).map_err(|e| match e {
        LaunchError::Json(e) => AppError::bad_gateway(format!("model returned invalid listing JSON: {e}")),
        other => AppError::from(other),
    })?;
    Ok(Json(listing))
}

// ---------------------------------------------------------------------------
// Privacy policy
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct PolicyBody {
    pub app_name: String,
    #[serde(default)]
    pub category: AppCategory,
    #[serde(default)]
    pub language: Option<Language>,
}

/// POST /api/studio/policy: privacy policy template in Markdown.
pub async fn generate_policy(
    State(app): State<AppState>,
    Json(body): Json<PolicyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let app_name = required("app_name", &body.app_name)?;
    let lang = body.language.unwrap_or(app.config.language);
    let prompt = studio::privacy_policy_prompt(app_name, body.category, lang);
    let markdown = app.gemini.generate_text(&prompt).await?;
    Ok(Json(serde_json::json!({ "markdown": markdown })))
}
