use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AppStep
// ---------------------------------------------------------------------------

/// A top-level screen of the app. Every step change counts as one tracked
/// action for the ad cadence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStep {
    #[default]
    Idea,
    DevGuide,
    StoreListing,
    Policy,
    Publish,
}

impl AppStep {
    pub fn all() -> &'static [AppStep] {
        &[
            AppStep::Idea,
            AppStep::DevGuide,
            AppStep::StoreListing,
            AppStep::Policy,
            AppStep::Publish,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppStep::Idea => "IDEA",
            AppStep::DevGuide => "DEV_GUIDE",
            AppStep::StoreListing => "STORE_LISTING",
            AppStep::Policy => "POLICY",
            AppStep::Publish => "PUBLISH",
        }
    }
}

impl fmt::Display for AppStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppStep {
    type Err = crate::error::LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppStep::all()
            .iter()
            .copied()
            .find(|step| step.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::error::LaunchError::InvalidStep(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    #[default]
    Tr,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    /// English name of the language, as used inside prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Tr => "Turkish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::error::LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            _ => Err(crate::error::LaunchError::InvalidLanguage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
