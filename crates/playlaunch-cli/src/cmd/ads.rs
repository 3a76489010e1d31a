use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use playlaunch_core::ads::{AdController, SlotState, TrackOutcome};
use playlaunch_core::config::Config;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[derive(Subcommand)]
pub enum AdsSubcommand {
    /// Show the current cadence settings
    Status,
    /// Replay a series of user actions against a fresh ad slot
    Simulate {
        /// Number of actions to track
        #[arg(long, default_value = "9", value_parser = clap::value_parser!(u32).range(1..=100_000))]
        actions: u32,
        /// Pause between actions, in milliseconds
        #[arg(long, default_value = "700")]
        interval_ms: u64,
        /// Override the simulated fill latency
        #[arg(long)]
        load_delay_ms: Option<u64>,
        /// Override the frequency cap
        #[arg(long)]
        cap: Option<u32>,
    },
}

#[derive(Serialize)]
struct SimStep {
    action: u32,
    #[serde(flatten)]
    outcome: TrackOutcome,
    slot: SlotState,
}

pub fn run(root: &Path, subcmd: AdsSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    match subcmd {
        AdsSubcommand::Status => status(&config, json),
        AdsSubcommand::Simulate {
            actions,
            interval_ms,
            load_delay_ms,
            cap,
        } => {
            let mut ads = config.ads.clone();
            if let Some(ms) = load_delay_ms {
                ads.load_delay_ms = ms;
            }
            if let Some(cap) = cap {
                ads.frequency_cap = cap;
            }
            let interval = Duration::from_millis(interval_ms);
            let rt = tokio::runtime::Runtime::new()?;
            let steps = rt.block_on(async move {
                let controller = AdController::from_config(&ads);
                simulate(&controller, actions, interval).await
            });
            report(&steps, json)
        }
    }
}

fn status(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&config.ads);
    }
    println!("frequency cap:  {}", config.ads.frequency_cap);
    println!("load delay:     {}ms", config.ads.load_delay_ms);
    println!("close after:    {}s", config.ads.dismiss_unlock_secs);
    println!("ad unit:        {}", config.ads.unit_id);
    Ok(())
}

/// Track `actions` actions, closing every interstitial right after it shows.
async fn simulate(controller: &AdController, actions: u32, interval: Duration) -> Vec<SimStep> {
    let mut steps = Vec::new();
    for action in 1..=actions {
        tokio::time::sleep(interval).await;
        let outcome = controller.track_action();
        let slot = controller.snapshot().state;
        if outcome == TrackOutcome::Shown {
            controller.dismiss_ad();
        }
        steps.push(SimStep {
            action,
            outcome,
            slot,
        });
    }
    steps
}

fn report(steps: &[SimStep], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&steps);
    }

    let rows = steps
        .iter()
        .map(|s| {
            let (outcome, count) = match s.outcome {
                TrackOutcome::Ignored => ("ignored", String::new()),
                TrackOutcome::Counted { count } => ("counted", count.to_string()),
                TrackOutcome::Shown => ("shown", "0".to_string()),
                TrackOutcome::Skipped { count } => ("skipped", count.to_string()),
            };
            vec![
                s.action.to_string(),
                outcome.to_string(),
                count,
                format!("{:?}", s.slot).to_lowercase(),
            ]
        })
        .collect();
    print_table(&["ACTION", "OUTCOME", "COUNT", "SLOT"], rows);

    let shown = steps
        .iter()
        .filter(|s| s.outcome == TrackOutcome::Shown)
        .count();
    println!("\n{shown} interstitial(s) shown in {} actions", steps.len());
    Ok(())
}
