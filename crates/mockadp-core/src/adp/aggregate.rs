// Average Draft Position aggregation over every stored draft.
//
// The table is a pure function of the store contents: it is recomputed on
// every call and never cached or persisted.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::identity::IdentityResolver;
use crate::draft::record::DraftRecord;
use crate::store::DraftRepository;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Summary statistics for one player across all stored drafts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdpAggregate {
    pub player_name: String,
    /// Number of picks recorded for the player.
    pub times_drafted: usize,
    /// `times_drafted / total drafts in the store * 100`. The denominator
    /// counts every stored draft, including drafts where the player was a
    /// keeper and could not be picked.
    pub draft_percentage: f64,
    /// Mean overall pick, rounded to one decimal.
    pub average_pick: f64,
    pub median_pick: f64,
    pub earliest_pick: u32,
    pub latest_pick: u32,
    /// Sample standard deviation of overall pick, rounded to one decimal.
    /// Zero with fewer than two observations.
    pub std_dev: f64,
    /// Every observed overall pick, ascending.
    pub all_picks: Vec<u32>,
}

/// Raised when the store holds fewer drafts than the caller's hint. The
/// table is still computed in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWarning {
    pub drafts: usize,
    pub recommended: usize,
}

impl fmt::Display for SampleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} drafts available; at least {} recommended for reliable ADP",
            self.drafts, self.recommended
        )
    }
}

/// Secondary ordering for players with equal average pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ascending display name.
    #[default]
    Name,
    /// More times drafted first, then ascending display name.
    TimesDrafted,
}

impl TieBreak {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "name" => Some(Self::Name),
            "times_drafted" | "count" => Some(Self::TimesDrafted),
            _ => None,
        }
    }

    fn compare(self, a: &AdpAggregate, b: &AdpAggregate) -> Ordering {
        match self {
            TieBreak::Name => a.player_name.cmp(&b.player_name),
            TieBreak::TimesDrafted => b
                .times_drafted
                .cmp(&a.times_drafted)
                .then_with(|| a.player_name.cmp(&b.player_name)),
        }
    }
}

/// Per-player aggregates keyed by canonical player key, with no ordering.
#[derive(Debug, Clone, Default)]
pub struct AdpTable {
    players: HashMap<String, AdpAggregate>,
    total_drafts: usize,
    warning: Option<SampleWarning>,
}

impl AdpTable {
    pub fn total_drafts(&self) -> usize {
        self.total_drafts
    }

    pub fn warning(&self) -> Option<SampleWarning> {
        self.warning
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Aggregate by exact key.
    pub fn get(&self, key: &str) -> Option<&AdpAggregate> {
        self.players.get(key)
    }

    /// Aggregate by key, falling back to a case-insensitive display-name
    /// match.
    pub fn player(&self, name: &str) -> Option<&AdpAggregate> {
        self.players.get(name).or_else(|| {
            let wanted = name.trim().to_lowercase();
            self.players
                .values()
                .find(|a| a.player_name.to_lowercase() == wanted)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AdpAggregate)> {
        self.players.iter()
    }

    pub fn into_map(self) -> HashMap<String, AdpAggregate> {
        self.players
    }

    /// All aggregates ordered by ascending average pick (earlier = more
    /// valuable), ties resolved by `tie_break` and finally by canonical key,
    /// so players sharing a display name still order the same way every time.
    pub fn ranked(&self, tie_break: TieBreak) -> Vec<&AdpAggregate> {
        let mut ranked: Vec<(&String, &AdpAggregate)> = self.players.iter().collect();
        ranked.sort_by(|(key_a, a), (key_b, b)| {
            a.average_pick
                .total_cmp(&b.average_pick)
                .then_with(|| tie_break.compare(a, b))
                .then_with(|| key_a.cmp(key_b))
        });
        ranked.into_iter().map(|(_, a)| a).collect()
    }

    /// First `n` of [`AdpTable::ranked`].
    pub fn top(&self, n: usize, tie_break: TieBreak) -> Vec<&AdpAggregate> {
        let mut ranked = self.ranked(tie_break);
        ranked.truncate(n);
        ranked
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute ADP for every player in `store`, keyed by display name exactly as
/// recorded.
///
/// `min_drafts_hint` is advisory: below it a [`SampleWarning`] is attached
/// and logged, and the output is otherwise unchanged.
pub fn calculate_adp<S: DraftRepository + ?Sized>(store: &S, min_drafts_hint: usize) -> AdpTable {
    calculate_adp_with(store.drafts(), &IdentityResolver::default(), min_drafts_hint)
}

/// Compute ADP over `drafts`, grouping picks by the key `resolver` assigns.
/// Picks that resolve to no key are left out.
pub fn calculate_adp_with(
    drafts: &[DraftRecord],
    resolver: &IdentityResolver,
    min_drafts_hint: usize,
) -> AdpTable {
    let total_drafts = drafts.len();

    let warning = (total_drafts < min_drafts_hint).then(|| SampleWarning {
        drafts: total_drafts,
        recommended: min_drafts_hint,
    });
    if let Some(w) = &warning {
        warn!("{w}");
    }

    // key -> (first display name seen, overall picks)
    let mut picks_by_player: HashMap<String, (String, Vec<u32>)> = HashMap::new();
    for draft in drafts {
        for pick in &draft.picks {
            let Some(key) = resolver.key_for(pick) else {
                debug!(
                    "skipping pick {} in draft {}: no player identity",
                    pick.overall_pick, draft.draft_id
                );
                continue;
            };
            picks_by_player
                .entry(key)
                .or_insert_with(|| (resolver.display_name(pick).to_string(), Vec::new()))
                .1
                .push(pick.overall_pick);
        }
    }

    let players = picks_by_player
        .into_iter()
        .map(|(key, (name, picks))| {
            let aggregate = aggregate_picks(name, picks, total_drafts);
            (key, aggregate)
        })
        .collect();

    AdpTable {
        players,
        total_drafts,
        warning,
    }
}

/// Build one aggregate from a non-empty list of overall picks.
fn aggregate_picks(player_name: String, mut picks: Vec<u32>, total_drafts: usize) -> AdpAggregate {
    picks.sort_unstable();
    let n = picks.len();
    let values: Vec<f64> = picks.iter().map(|&p| f64::from(p)).collect();

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    let std_dev = if n > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    let draft_percentage = if total_drafts == 0 {
        0.0
    } else {
        n as f64 / total_drafts as f64 * 100.0
    };

    AdpAggregate {
        player_name,
        times_drafted: n,
        draft_percentage,
        average_pick: round1(mean),
        median_pick: median,
        earliest_pick: picks[0],
        latest_pick: picks[n - 1],
        std_dev: round1(std_dev),
        all_picks: picks,
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
