use crate::error::{LaunchError, Result};
use crate::paths;
use crate::progress::ProgressReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }
}

const LAUNCH_STEPS: [(&str, &str); 8] = [
    (
        "Create Developer Account",
        "Sign up for Google Play Console ($25 one-time fee).",
    ),
    (
        "Prepare Store Graphics",
        "Icon (512x512), Feature Graphic (1024x500), Screenshots.",
    ),
    (
        "Create App in Console",
        "Configure language, app type, and pricing model.",
    ),
    (
        "Content Rating (IARC)",
        "Complete the content rating questionnaire.",
    ),
    (
        "Privacy Policy",
        "Link your privacy policy URL in App Content.",
    ),
    (
        "Upload App Bundle",
        "Build signed .aab and upload to Production track.",
    ),
    (
        "Target Audience",
        "Define age groups and family policy settings.",
    ),
    (
        "Start Rollout",
        "Review warnings and start production rollout.",
    ),
];

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// The launch checklist owned by the UI. Order is display order only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    /// The eight Play Console launch steps, all open.
    pub fn default_launch() -> Self {
        let items = LAUNCH_STEPS
            .iter()
            .enumerate()
            .map(|(i, (title, desc))| ChecklistItem::new((i + 1).to_string(), *title, *desc))
            .collect();
        Self {
            items,
            updated_at: Utc::now(),
        }
    }

    /// Load `.playlaunch/checklist.yaml`, or the default launch steps when
    /// nothing has been saved yet.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::checklist_path(root);
        if !path.exists() {
            return Ok(Self::default_launch());
        }
        let data = std::fs::read_to_string(&path)?;
        let checklist: Checklist = serde_yaml::from_str(&data)?;
        Ok(checklist)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::checklist_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Flip an item's completion flag and return the new value.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LaunchError::ChecklistItemNotFound(id.to_string()))?;
        item.completed = !item.completed;
        self.updated_at = Utc::now();
        Ok(item.completed)
    }

    pub fn reset(&mut self) {
        for item in &mut self.items {
            item.completed = false;
        }
        self.updated_at = Utc::now();
    }

    pub fn progress(&self) -> ProgressReport {
        ProgressReport::from_items(&self.items)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
