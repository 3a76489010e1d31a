use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use playlaunch_core::checklist::Checklist;
use playlaunch_core::progress::ProgressReport;
use std::path::Path;

#[derive(Subcommand)]
pub enum ChecklistSubcommand {
    /// List launch steps and the current rank
    List,
    /// Mark a step done, or open again if it was done
    Toggle {
        /// Step id as shown by `checklist list`
        id: String,
    },
    /// Mark every step open
    Reset,
}

pub fn run(root: &Path, subcmd: ChecklistSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ChecklistSubcommand::List => list(root, json),
        ChecklistSubcommand::Toggle { id } => toggle(root, &id, json),
        ChecklistSubcommand::Reset => reset(root, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let checklist = Checklist::load(root).context("failed to load checklist")?;

    if json {
        return print_json(&serde_json::json!({
            "items": checklist.items,
            "progress": checklist.progress(),
        }));
    }

    let rows = checklist
        .items
        .iter()
        .map(|item| {
            vec![
                item.id.clone(),
                if item.completed { "x" } else { " " }.to_string(),
                item.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "DONE", "STEP"], rows);
    println!();
    print_rank(&checklist.progress());
    Ok(())
}

fn toggle(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let mut checklist = Checklist::load(root).context("failed to load checklist")?;
    let completed = checklist.toggle(id)?;
    checklist.save(root).context("failed to save checklist")?;
    let progress = checklist.progress();

    if json {
        print_json(&serde_json::json!({
            "id": id,
            "completed": completed,
            "progress": progress,
        }))?;
    } else {
        let state = if completed { "done" } else { "open" };
        println!("Step {id} marked {state}.");
        print_rank(&progress);
    }
    Ok(())
}

fn reset(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut checklist = Checklist::load(root).context("failed to load checklist")?;
    checklist.reset();
    checklist.save(root).context("failed to save checklist")?;

    if json {
        print_json(&serde_json::json!({ "progress": checklist.progress() }))?;
    } else {
        println!("Checklist reset.");
        print_rank(&checklist.progress());
    }
    Ok(())
}

fn print_rank(progress: &ProgressReport) {
    println!(
        "Progress: {}% ({}/{})  Rank: {}",
        progress.percent,
        progress.completed,
        progress.total,
        progress.tier.title()
    );
    if let Some(next) = progress.next_threshold {
        println!("Next rank at {next}%");
    }
}
