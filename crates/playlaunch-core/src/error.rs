use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("not initialized: run 'playlaunch init'")]
    NotInitialized,

    #[error("checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("invalid language '{0}': expected 'en' or 'tr'")]
    InvalidLanguage(String),

    #[error("invalid app category: {0}")]
    InvalidCategory(String),

    #[error("invalid percentage {0}: must be between 0 and 100")]
    InvalidPercent(u32),

    #[error("empty response from language model")]
    EmptyResponse,

    #[error("ad load failed: {0}")]
    AdLoad(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
