use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use gemini_client::GeminiClient;
use playlaunch_core::config::Config;
use playlaunch_core::studio::{self, AppCategory};
use playlaunch_core::types::Language;
use std::path::Path;

#[derive(Subcommand)]
pub enum StudioSubcommand {
    /// Market viability, competitors, monetization and MVP features for an idea
    Analyze {
        #[arg(required = true)]
        concept: Vec<String>,
        /// Response language: en or tr (default: config language)
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Generate a Play Store listing (title, descriptions, keywords)
    Listing {
        /// App name
        #[arg(long)]
        name: String,
        #[arg(required = true)]
        concept: Vec<String>,
        /// Language the listing is written in, e.g. "English" or "German"
        #[arg(long)]
        target_language: Option<String>,
    },
    /// Generate a privacy policy template
    Policy {
        /// App name
        #[arg(long)]
        name: String,
        /// utility, game, social, shopping or education
        #[arg(long, default_value = "utility")]
        category: AppCategory,
        /// Policy language: en or tr (default: config language)
        #[arg(long)]
        lang: Option<Language>,
    },
}

pub fn run(root: &Path, subcmd: StudioSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let client = playlaunch_server::state::gemini_from_config(&config.ai);
    let rt = tokio::runtime::Runtime::new()?;

    match subcmd {
        StudioSubcommand::Analyze { concept, lang } => {
            let lang = lang.unwrap_or(config.language);
            let prompt = studio::idea_analysis_prompt(&concept.join(" "), lang);
            let markdown = rt.block_on(generate_text(&client, &prompt))?;
            print_markdown(&markdown, json)
        }
        StudioSubcommand::Listing {
            name,
            concept,
            target_language,
        } => {
            let target = target_language.unwrap_or_else(|| config.language.name().to_string());
            let prompt = studio::store_listing_prompt(&name, &concept.join(" "), &target);
            let raw = rt
                .block_on(client.generate_json(&prompt))
                .context("store listing request failed")?;
            let listing =
                studio::parse_store_listing(&raw).context("model returned an unusable listing")?;

            if json {
                return print_json(&listing);
            }
            println!("Title:             {}", listing.title);
            println!("Short description: {}", listing.short_description);
            println!("Keywords:          {}", listing.keywords.join(", "));
            println!("\n{}", listing.full_description);
            Ok(())
        }
        StudioSubcommand::Policy {
            name,
            category,
            lang,
        } => {
            let lang = lang.unwrap_or(config.language);
            let prompt = studio::privacy_policy_prompt(&name, category, lang);
            let markdown = rt.block_on(generate_text(&client, &prompt))?;
            print_markdown(&markdown, json)
        }
    }
}

async fn generate_text(client: &GeminiClient, prompt: &str) -> anyhow::Result<String> {
    client
        .generate_text(prompt)
        .await
        .context("language model request failed")
}

fn print_markdown(markdown: &str, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({ "markdown": markdown }))
    } else {
        println!("{markdown}");
        Ok(())
    }
}
