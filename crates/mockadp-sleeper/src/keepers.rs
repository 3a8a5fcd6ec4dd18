// League keeper lookup: each current roster matched against the league's
// draft from the prior season, so every rostered player shows the round and
// pick it cost.

use std::collections::HashMap;

use serde::Serialize;

use crate::importer::translate_picks;
use crate::models::{LeagueMember, PlayerDirectory, RawPick, SleeperDraft, SleeperLeague, SleeperRoster};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Where a player went in the prior season's league draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorPick {
    pub round: u32,
    pub pick_in_round: u32,
    pub overall: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterPlayer {
    pub player_id: String,
    pub name: String,
    pub position: String,
    pub nfl_team: String,
    /// `None` when the player was not drafted (waiver or trade pickup).
    pub prior: Option<PriorPick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeeperTeam {
    pub owner_id: String,
    pub owner_name: String,
    /// Team name from the member's league metadata, else the owner name.
    pub team_name: String,
    /// Drafted players by overall pick, then undrafted players by name.
    pub players: Vec<RosterPlayer>,
}

impl KeeperTeam {
    pub fn drafted(&self) -> usize {
        self.players.iter().filter(|p| p.prior.is_some()).count()
    }

    pub fn undrafted(&self) -> usize {
        self.players.len() - self.drafted()
    }

    pub fn earliest_pick(&self) -> Option<u32> {
        self.players.iter().filter_map(|p| p.prior).map(|p| p.overall).min()
    }

    pub fn latest_pick(&self) -> Option<u32> {
        self.players.iter().filter_map(|p| p.prior).map(|p| p.overall).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeeperReport {
    pub league_id: String,
    pub league_name: String,
    /// Season the rosters belong to.
    pub season: u16,
    /// Season of the draft the rosters were matched against.
    pub draft_season: u16,
    /// `None` when no draft for `draft_season` was found.
    pub draft_id: Option<String>,
    /// Ordered by owner name.
    pub teams: Vec<KeeperTeam>,
}

impl KeeperReport {
    /// Team whose name or owner name matches, ignoring case.
    pub fn team(&self, name: &str) -> Option<&KeeperTeam> {
        let wanted = name.trim().to_lowercase();
        self.teams
            .iter()
            .find(|t| t.team_name.to_lowercase() == wanted || t.owner_name.to_lowercase() == wanted)
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn draft_season_of(draft: &SleeperDraft) -> Option<u16> {
    draft.season.as_deref().and_then(|s| s.trim().parse().ok())
}

/// The league's draft for `draft_season`: completed drafts first, then the
/// most recently created.
pub fn select_prior_draft(drafts: &[SleeperDraft], draft_season: u16) -> Option<&SleeperDraft> {
    drafts
        .iter()
        .filter(|d| draft_season_of(d) == Some(draft_season))
        .max_by_key(|d| (d.is_complete(), d.created.unwrap_or(0)))
}

fn directory_name(player_id: &str, players: &PlayerDirectory) -> String {
    let Some(info) = players.get(player_id) else {
        return format!("Unknown Player ({player_id})");
    };
    if let Some(full) = info.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return full.to_string();
    }
    let joined = format!(
        "{} {}",
        info.first_name.as_deref().unwrap_or(""),
        info.last_name.as_deref().unwrap_or("")
    );
    match joined.trim() {
        "" => format!("Unknown Player ({player_id})"),
        name => name.to_string(),
    }
}

/// Match every roster of `league` against the picks of its prior draft.
///
/// Rosters without an owner or without players are left out.
#[allow(clippy::too_many_arguments)]
pub fn build_keeper_report(
    league: &SleeperLeague,
    season: u16,
    draft_season: u16,
    draft_id: Option<String>,
    rosters: &[SleeperRoster],
    members: &[LeagueMember],
    picks: &[RawPick],
    players: &PlayerDirectory,
) -> KeeperReport {
    let (records, _, _) = translate_picks(picks, players);
    let prior_by_id: HashMap<&str, PriorPick> = records
        .iter()
        .filter_map(|p| {
            let id = p.player_id.as_deref()?;
            Some((
                id,
                PriorPick {
                    round: p.round_num,
                    pick_in_round: p.pick_num,
                    overall: p.overall_pick,
                },
            ))
        })
        .collect();
    let members_by_id: HashMap<&str, &LeagueMember> =
        members.iter().map(|m| (m.user_id.as_str(), m)).collect();

    let mut teams: Vec<KeeperTeam> = rosters
        .iter()
        .filter_map(|roster| {
            let owner_id = roster.owner_id.as_deref().filter(|id| !id.is_empty())?;
            let roster_players = roster.players.as_deref().filter(|p| !p.is_empty())?;

            let member = members_by_id.get(owner_id);
            let owner_name = member
                .and_then(|m| m.display_name.clone())
                .unwrap_or_else(|| "Unknown Owner".to_string());
            let team_name = member
                .and_then(|m| m.metadata.as_ref())
                .and_then(|meta| meta.team_name.clone())
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| owner_name.clone());

            let mut roster_entries: Vec<RosterPlayer> = roster_players
                .iter()
                .map(|id| {
                    let info = players.get(id);
                    RosterPlayer {
                        player_id: id.clone(),
                        name: directory_name(id, players),
                        position: info.and_then(|i| i.position.clone()).unwrap_or_else(|| "UNK".into()),
                        nfl_team: info.and_then(|i| i.team.clone()).unwrap_or_else(|| "FA".into()),
                        prior: prior_by_id.get(id.as_str()).copied(),
                    }
                })
                .collect();
            roster_entries.sort_by(|a, b| {
                let overall = |p: &RosterPlayer| p.prior.map_or(u32::MAX, |pp| pp.overall);
                overall(a).cmp(&overall(b)).then_with(|| a.name.cmp(&b.name))
            });

            Some(KeeperTeam {
                owner_id: owner_id.to_string(),
                owner_name,
                team_name,
                players: roster_entries,
            })
        })
        .collect();
    teams.sort_by(|a, b| a.owner_name.cmp(&b.owner_name));

    KeeperReport {
        league_id: league.league_id.clone(),
        league_name: league.name().to_string(),
        season,
        draft_season,
        draft_id,
        teams,
    }
}
