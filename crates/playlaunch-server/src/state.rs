use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gemini_client::GeminiClient;
use playlaunch_core::ads::AdController;
use playlaunch_core::config::{AiConfig, Config};
use playlaunch_core::types::AppStep;
use tokio::sync::{Mutex, RwLock};

use crate::interstitial::Interstitial;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub ads: AdController,
    pub interstitial: Interstitial,
    pub gemini: Arc<GeminiClient>,
    pub step: Arc<RwLock<AppStep>>,
    /// Held across each load-modify-save of `checklist.yaml`.
    pub checklist_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Build the session: one ad controller (which starts preloading when a
    /// tokio runtime is available), its presenter, and the model client.
    pub fn new(root: PathBuf, config: Config) -> Self {
        let ads = AdController::from_config(&config.ads);
        let interstitial = Interstitial::attach(
            ads.clone(),
            Duration::from_secs(config.ads.dismiss_unlock_secs),
        );
        let gemini = gemini_from_config(&config.ai);
        Self {
            root,
            config: Arc::new(config),
            ads,
            interstitial,
            gemini: Arc::new(gemini),
            step: Arc::new(RwLock::new(AppStep::default())),
            checklist_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the model client, e.g. to point at a local mock.
    pub fn with_gemini(mut self, client: GeminiClient) -> Self {
        self.gemini = Arc::new(client);
        self
    }
}

pub fn gemini_from_config(ai: &AiConfig) -> GeminiClient {
    let client = GeminiClient::new(ai.resolve_api_key()).with_model(ai.model.clone());
    match &ai.base_url {
        Some(url) => client.with_base_url(url.clone()),
        None => client,
    }
}
