// Derived views over the draft store: dataset summary and per-draft pick
// value against the custom ADP.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::{round1, AdpTable};
use super::identity::IdentityResolver;
use crate::draft::record::DraftRecord;

/// How many recent drafts the summary lists.
const RECENT_DRAFTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftOverview {
    pub draft_id: String,
    pub draft_date: DateTime<Utc>,
    pub picks: usize,
    pub keepers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSummary {
    pub total_drafts: usize,
    pub total_picks: usize,
    /// Zero when the store is empty.
    pub avg_picks_per_draft: f64,
    /// Newest first, at most five.
    pub recent: Vec<DraftOverview>,
}

/// Totals plus the most recent drafts by draft date.
pub fn summarize(drafts: &[DraftRecord]) -> DraftSummary {
    let total_drafts = drafts.len();
    let total_picks: usize = drafts.iter().map(|d| d.picks.len()).sum();
    let avg_picks_per_draft = if total_drafts == 0 {
        0.0
    } else {
        total_picks as f64 / total_drafts as f64
    };

    let mut by_date: Vec<&DraftRecord> = drafts.iter().collect();
    by_date.sort_by(|a, b| b.draft_date.cmp(&a.draft_date));
    let recent = by_date
        .into_iter()
        .take(RECENT_DRAFTS)
        .map(|d| DraftOverview {
            draft_id: d.draft_id.clone(),
            draft_date: d.draft_date,
            picks: d.picks.len(),
            keepers: d.keepers.len(),
        })
        .collect();

    DraftSummary {
        total_drafts,
        total_picks,
        avg_picks_per_draft,
        recent,
    }
}

/// One pick compared against the custom ADP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickValue {
    pub player_name: String,
    pub overall_pick: u32,
    pub drafted_by_team: String,
    pub average_pick: f64,
    /// `average_pick - overall_pick`: positive means the player went later
    /// than usual.
    pub value: f64,
}

/// Value of each pick in `draft` relative to `table`, best value first.
///
/// `team` restricts the result to one drafting team. Picks for players the
/// table does not know are skipped. `resolver` must be the one `table` was
/// built with.
pub fn value_picks(
    draft: &DraftRecord,
    table: &AdpTable,
    resolver: &IdentityResolver,
    team: Option<&str>,
) -> Vec<PickValue> {
    let mut values: Vec<PickValue> = draft
        .picks
        .iter()
        .filter(|p| team.map_or(true, |t| p.drafted_by_team == t))
        .filter_map(|p| {
            let key = resolver.key_for(p)?;
            let adp = table.get(&key)?;
            Some(PickValue {
                player_name: adp.player_name.clone(),
                overall_pick: p.overall_pick,
                drafted_by_team: p.drafted_by_team.clone(),
                average_pick: adp.average_pick,
                value: round1(adp.average_pick - f64::from(p.overall_pick)),
            })
        })
        .collect();

    values.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.overall_pick.cmp(&b.overall_pick))
    });
    values
}
