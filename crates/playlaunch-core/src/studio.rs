//! Prompts and response handling for the AI-backed studio tools.
//!
//! The language model itself is an external collaborator; this module only
//! builds the prompt text and turns replies into typed values.

use crate::error::{LaunchError, Result};
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AppCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    #[default]
    Utility,
    Game,
    Social,
    Shopping,
    Education,
}

impl AppCategory {
    pub fn all() -> &'static [AppCategory] {
        &[
            AppCategory::Utility,
            AppCategory::Game,
            AppCategory::Social,
            AppCategory::Shopping,
            AppCategory::Education,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppCategory::Utility => "utility",
            AppCategory::Game => "game",
            AppCategory::Social => "social",
            AppCategory::Shopping => "shopping",
            AppCategory::Education => "education",
        }
    }

    /// Category label as written into the policy prompt.
    pub fn label(self) -> &'static str {
        match self {
            AppCategory::Utility => "Utility / Tool",
            AppCategory::Game => "Game",
            AppCategory::Social => "Social Networking",
            AppCategory::Shopping => "Shopping",
            AppCategory::Education => "Education",
        }
    }
}

impl fmt::Display for AppCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppCategory {
    type Err = LaunchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AppCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LaunchError::InvalidCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// StoreListing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListing {
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Parse the model's store-listing reply. A surrounding Markdown code fence
/// is tolerated even though the prompt asks for bare JSON.
pub fn parse_store_listing(text: &str) -> Result<StoreListing> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(LaunchError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") up to the first newline
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

pub fn idea_analysis_prompt(concept: &str, lang: Language) -> String {
    format!(
        "Act as a Senior Product Manager for Mobile Apps.\n\
         Analyze the following app concept for the Google Play Store:\n\
         \"{concept}\"\n\n\
         Respond in {language}.\n\
         Provide a response in Markdown covering:\n\
         1. Market Viability (High/Medium/Low)\n\
         2. Potential Competitors\n\
         3. Recommended Monetization Strategy\n\
         4. Top 3 Features to MVP (Minimum Viable Product)\n\n\
         Keep it concise and professional.",
        concept = concept.trim(),
        language = lang.name(),
    )
}

pub fn store_listing_prompt(app_name: &str, concept: &str, target_language: &str) -> String {
    format!(
        "Act as an ASO (App Store Optimization) expert.\n\
         Create a Google Play Store listing for an app named \"{app_name}\" based on this concept: \"{concept}\".\n\
         The target language for the content is: {target_language}.\n\n\
         Return ONLY a valid JSON object with the following schema (no markdown code blocks):\n\
         {{\n  \
           \"title\": \"App Title (max 30 chars)\",\n  \
           \"shortDescription\": \"Short description (max 80 chars)\",\n  \
           \"fullDescription\": \"Full description (formatted with simple HTML tags like <br> or <b>)\",\n  \
           \"keywords\": [\"keyword1\", \"keyword2\", \"keyword3\", \"keyword4\", \"keyword5\"]\n\
         }}",
        app_name = app_name.trim(),
        concept = concept.trim(),
    )
}

pub fn privacy_policy_prompt(app_name: &str, category: AppCategory, lang: Language) -> String {
    format!(
        "Write a generic Privacy Policy template for a Google Play Store app named \"{app_name}\".\n\
         The app type is: {category}.\n\
         Write the policy in {language}.\n\
         Include sections for: Data Collection, Third-party services (AdMob, Firebase), \
         User Rights, and Contact Information.\n\
         Format as Markdown.",
        app_name = app_name.trim(),
        category = category.label(),
        language = lang.name(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
