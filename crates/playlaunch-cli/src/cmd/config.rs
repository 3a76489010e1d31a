use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use playlaunch_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let key_present = config.ai.resolve_api_key().is_some();

    if json {
        let mut value = serde_json::to_value(&config)?;
        value["ai"]["api_key_present"] = serde_json::Value::Bool(key_present);
        return print_json(&value);
    }

    println!("project:   {}", config.project.name);
    println!("language:  {}", config.language.name());
    println!(
        "ads:       an interstitial every {} actions, {}ms fill, close after {}s",
        config.ads.frequency_cap, config.ads.load_delay_ms, config.ads.dismiss_unlock_secs
    );
    println!("ad unit:   {}", config.ads.unit_id);
    println!(
        "model:     {} (key from ${}: {})",
        config.ai.model,
        config.ai.api_key_env,
        if key_present { "set" } else { "missing" }
    );
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
