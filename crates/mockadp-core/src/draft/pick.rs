// Individual pick representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One player's selection in one draft.
///
/// The display name is the join key across drafts; `player_id` is only
/// populated when the source platform provides one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    /// Player display name as recorded by the source.
    pub player_name: String,
    /// External platform identifier, if known.
    #[serde(default)]
    pub player_id: Option<String>,
    /// Position code (e.g. "QB", "WR").
    pub position: String,
    /// Professional team code (e.g. "BUF"), "FA" for free agents.
    pub team: String,
    /// Round number (1-based).
    pub round_num: u32,
    /// Pick within the round (1-based).
    pub pick_num: u32,
    /// Draft-wide sequential pick number (1-based).
    pub overall_pick: u32,
    /// Label of the team that made the selection.
    pub drafted_by_team: String,
}

impl PickRecord {
    /// Whether the pick carries a usable player identity and positive pick
    /// coordinates. Overall pick and (round, pick-in-round) are not
    /// cross-checked against each other.
    pub fn is_well_formed(&self) -> bool {
        let has_identity = !self.player_name.trim().is_empty()
            || self.player_id.as_deref().is_some_and(|id| !id.trim().is_empty());
        has_identity && self.round_num > 0 && self.pick_num > 0 && self.overall_pick > 0
    }
}

impl fmt::Display for PickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} ({}.{:02}) {} {} {} -> {}",
            self.overall_pick,
            self.round_num,
            self.pick_num,
            self.player_name,
            self.position,
            self.team,
            self.drafted_by_team
        )
    }
}
