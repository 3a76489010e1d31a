//! Rank progression for the launch checklist.
//!
//! Everything here is a pure function of the checklist contents: the
//! percentage is recomputed on every read and the tier is derived from it.
//! Nothing is stored.

use crate::checklist::ChecklistItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milestones at which a new rank unlocks, ascending.
pub const THRESHOLDS: [u8; 4] = [25, 50, 75, 100];

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Novice,
    Strategist,
    Architect,
    Builder,
    Commander,
    Legend,
}

impl Tier {
    /// All tiers, lowest first.
    pub fn all() -> &'static [Tier] {
        &[
            Tier::Novice,
            Tier::Strategist,
            Tier::Architect,
            Tier::Builder,
            Tier::Commander,
            Tier::Legend,
        ]
    }

    /// Lowest percentage that earns this tier. Strategist is earned by any
    /// non-zero progress, so its floor is 1.
    pub fn min_percent(self) -> u8 {
        match self {
            Tier::Novice => 0,
            Tier::Strategist => 1,
            Tier::Architect => 25,
            Tier::Builder => 50,
            Tier::Commander => 75,
            Tier::Legend => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Novice => "novice",
            Tier::Strategist => "strategist",
            Tier::Architect => "architect",
            Tier::Builder => "builder",
            Tier::Commander => "commander",
            Tier::Legend => "legend",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tier::Novice => "Novice",
            Tier::Strategist => "Strategist",
            Tier::Architect => "Architect",
            Tier::Builder => "Builder",
            Tier::Commander => "Commander",
            Tier::Legend => "Legend",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Percentage of completed items, rounded half-up. An empty checklist is 0%.
pub fn compute_progress(items: &[ChecklistItem]) -> u8 {
    let total = items.len();
    if total == 0 {
        return 0;
    }
    let done = items.iter().filter(|i| i.completed).count();
    // round(100 * done / total) in integer arithmetic, ties rounding up
    ((200 * done + total) / (2 * total)) as u8
}

/// Pick the highest tier whose floor `percent` reaches.
pub fn select_tier(percent: u8) -> Tier {
    Tier::all()
        .iter()
        .rev()
        .copied()
        .find(|t| percent >= t.min_percent())
        .unwrap_or(Tier::Novice)
}

/// Smallest threshold strictly above `percent`; saturates at 100.
pub fn next_threshold(percent: u8) -> u8 {
    THRESHOLDS
        .iter()
        .copied()
        .find(|&th| th > percent)
        .unwrap_or(100)
}

// ---------------------------------------------------------------------------
// ProgressReport
// ---------------------------------------------------------------------------

/// Everything the rank card needs, derived from one checklist snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub tier: Tier,
    /// `None` once the checklist is finished; there is no rank beyond Legend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_threshold: Option<u8>,
}

impl ProgressReport {
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let percent = compute_progress(items);
        Self {
            completed: items.iter().filter(|i| i.completed).count(),
            total: items.len(),
            percent,
            tier: select_tier(percent),
            next_threshold: (percent < 100).then(|| next_threshold(percent)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn items(done: usize, total: usize) -> Vec<ChecklistItem> {
        (0..total)
            .map(|i| ChecklistItem {
                id: (i + 1).to_string(),
                title: format!("Step {}", i + 1),
                description: String::new(),
                completed: i < done,
            })
            .collect()
    }

    #[test]
    fn empty_checklist_is_zero_percent() {
        assert_eq!(compute_progress(&[]), 0);
        let report = ProgressReport::from_items(&[]);
        assert_eq!(report.tier, Tier::Novice);
        assert_eq!(report.next_threshold, Some(25));
    }

    #[test]
    fn progress_rounds_half_up() {
        // 1/8 = 12.5 -> 13, 3/8 = 37.5 -> 38
        assert_eq!(compute_progress(&items(1, 8)), 13);
        assert_eq!(compute_progress(&items(3, 8)), 38);
        // 1/3 = 33.33 -> 33, 2/3 = 66.67 -> 67
        assert_eq!(compute_progress(&items(1, 3)), 33);
        assert_eq!(compute_progress(&items(2, 3)), 67);
        assert_eq!(compute_progress(&items(8, 8)), 100);
    }

    #[test]
    fn progress_is_monotonic_in_completed_items() {
        for total in 1..=12 {
            let mut last = 0;
            for done in 0..=total {
                let pct = compute_progress(&items(done, total));
                assert!(pct >= last, "{done}/{total} dropped to {pct}");
                last = pct;
            }
        }
    }

    #[test]
    fn progress_ignores_item_order() {
        let mut list = items(3, 8);
        let before = compute_progress(&list);
        list.reverse();
        assert_eq!(compute_progress(&list), before);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(select_tier(0), Tier::Novice);
        assert_eq!(select_tier(1), Tier::Strategist);
        assert_eq!(select_tier(24), Tier::Strategist);
        assert_eq!(select_tier(25), Tier::Architect);
        assert_eq!(select_tier(49), Tier::Architect);
        assert_eq!(select_tier(50), Tier::Builder);
        assert_eq!(select_tier(74), Tier::Builder);
        assert_eq!(select_tier(75), Tier::Commander);
        assert_eq!(select_tier(99), Tier::Commander);
        assert_eq!(select_tier(100), Tier::Legend);
    }

    #[test]
    fn tier_is_total_and_monotonic() {
        let mut last = Tier::Novice;
        for pct in 0..=100u8 {
            let tier = select_tier(pct);
            assert!(tier >= last, "tier went down at {pct}%");
            last = tier;
        }
        assert_eq!(last, Tier::Legend);
    }

    #[test]
    fn next_threshold_table() {
        let cases = [
            (0, 25),
            (10, 25),
            (25, 50),
            (49, 50),
            (75, 100),
            (99, 100),
            (100, 100),
        ];
        for (pct, expected) in cases {
            assert_eq!(next_threshold(pct), expected, "next_threshold({pct})");
        }
    }

    #[test]
    fn two_of_eight_reaches_architect() {
        let list = items(2, 8);
        assert_eq!(compute_progress(&list), 25);
        assert_eq!(select_tier(25), Tier::Architect);
        assert_eq!(next_threshold(25), 50);

        let report = ProgressReport::from_items(&list);
        assert_eq!(report.completed, 2);
        assert_eq!(report.total, 8);
        assert_eq!(report.tier, Tier::Architect);
        assert_eq!(report.next_threshold, Some(50));
    }

    #[test]
    fn finished_checklist_has_no_next_rank() {
        let report = ProgressReport::from_items(&items(8, 8));
        assert_eq!(report.percent, 100);
        assert_eq!(report.tier, Tier::Legend);
        assert!(report.next_threshold.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("next_threshold").is_none());
        assert_eq!(json["tier"], "legend");
    }
}
