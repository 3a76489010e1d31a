use anyhow::Context;
use playlaunch_core::{checklist::Checklist, config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing playlaunch in: {}", root.display());

    let dir = paths::playlaunch_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    if !paths::config_path(root).exists() {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    if !paths::checklist_path(root).exists() {
        Checklist::default_launch()
            .save(root)
            .context("failed to write checklist.yaml")?;
        println!("  created: {}", paths::CHECKLIST_FILE);
    } else {
        println!("  exists:  {}", paths::CHECKLIST_FILE);
    }

    println!("\nNext: playlaunch checklist list");
    Ok(())
}
