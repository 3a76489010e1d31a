use crate::ads::{DEFAULT_FREQUENCY_CAP, TEST_INTERSTITIAL_ID};
use crate::error::{LaunchError, Result};
use crate::paths;
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AdsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    /// Tracked actions between interstitial attempts.
    #[serde(default = "default_frequency_cap")]
    pub frequency_cap: u32,
    /// Simulated fill latency for the background load.
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    /// Seconds an interstitial stays on screen before it can be closed.
    #[serde(default = "default_dismiss_unlock_secs")]
    pub dismiss_unlock_secs: u64,
    #[serde(default = "default_unit_id")]
    pub unit_id: String,
}

fn default_frequency_cap() -> u32 {
    DEFAULT_FREQUENCY_CAP
}

fn default_load_delay_ms() -> u64 {
    1500
}

fn default_dismiss_unlock_secs() -> u64 {
    3
}

fn default_unit_id() -> String {
    TEST_INTERSTITIAL_ID.to_string()
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            frequency_cap: default_frequency_cap(),
            load_delay_ms: default_load_delay_ms(),
            dismiss_unlock_secs: default_dismiss_unlock_secs(),
            unit_id: default_unit_id(),
        }
    }
}

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Override for the API endpoint (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

impl AiConfig {
    /// Resolve the API key from the configured variable, then `GEMINI_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            language: Language::default(),
            ads: AdsConfig::default(),
            ai: AiConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(LaunchError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but an uninitialized root yields defaults named
    /// after the directory.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(LaunchError::NotInitialized) => {
                let name = root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "playlaunch".to_string());
                Ok(Self::new(name))
            }
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project.name is empty".to_string(),
            });
        }

        if self.ads.frequency_cap == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ads.frequency_cap is 0; treated as 1 (an ad on every action)"
                    .to_string(),
            });
        }

        if self.ads.load_delay_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ads.load_delay_ms is 0; ads will be ready instantly".to_string(),
            });
        }

        if self.ads.dismiss_unlock_secs > 30 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "ads.dismiss_unlock_secs is {}; interstitials longer than 30s are rarely accepted",
                    self.ads.dismiss_unlock_secs
                ),
            });
        }

        if self.ai.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "ai.model is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
