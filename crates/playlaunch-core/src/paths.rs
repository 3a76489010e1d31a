use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PLAYLAUNCH_DIR: &str = ".playlaunch";

pub const CONFIG_FILE: &str = ".playlaunch/config.yaml";
pub const CHECKLIST_FILE: &str = ".playlaunch/checklist.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn playlaunch_dir(root: &Path) -> PathBuf {
    root.join(PLAYLAUNCH_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn checklist_path(root: &Path) -> PathBuf {
    root.join(CHECKLIST_FILE)
}
