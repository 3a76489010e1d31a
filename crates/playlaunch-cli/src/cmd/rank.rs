use crate::output::print_json;
use playlaunch_core::progress::{next_threshold, select_tier};
use playlaunch_core::LaunchError;

pub fn run(percent: u32, json: bool) -> anyhow::Result<()> {
    let pct = u8::try_from(percent)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or(LaunchError::InvalidPercent(percent))?;
    let tier = select_tier(pct);
    let next = next_threshold(pct);

    if json {
        return print_json(&serde_json::json!({
            "percent": pct,
            "tier": tier,
            "title": tier.title(),
            "next_threshold": next,
        }));
    }

    println!("{pct}%: {}", tier.title());
    if pct < 100 {
        println!("Next rank at {next}%");
    }
    Ok(())
}
