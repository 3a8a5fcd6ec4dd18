// Translates Sleeper draft payloads into draft records and appends them to
// a draft store.
//
// Boundary policy: picks without a player id are dropped with a log line,
// never treated as fatal. Everything past this module only sees well-formed
// PickRecords.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use mockadp_core::draft::pick::PickRecord;
use mockadp_core::draft::record::DraftRecord;
use mockadp_core::manual::slot_for;
use mockadp_core::store::DraftRepository;
use serde::Serialize;
use tracing::{info, warn};

use crate::client::DraftPlatform;
use crate::error::ImportError;
use crate::keepers::{build_keeper_report, select_prior_draft, KeeperReport};
use crate::models::{PlayerDirectory, RawPick, SleeperDraft};

/// Used when every pick of a draft was dropped.
pub const DEFAULT_LEAGUE_SIZE: u32 = 12;
pub const DEFAULT_ROUNDS: u32 = 16;

// ---------------------------------------------------------------------------
// Discovery types
// ---------------------------------------------------------------------------

/// Which drafts [`Importer::discover`] returns.
#[derive(Debug, Clone)]
pub struct DraftFilter {
    /// Only drafts classified as mocks (see [`SleeperDraft::is_mock`]).
    pub mock_only: bool,
    /// Only drafts whose status is `complete`.
    pub completed_only: bool,
    /// Only drafts created at most this many days ago.
    pub within_days: Option<i64>,
}

impl Default for DraftFilter {
    fn default() -> Self {
        Self {
            mock_only: true,
            completed_only: true,
            within_days: None,
        }
    }
}

impl DraftFilter {
    fn accepts(&self, draft: &SleeperDraft, now: DateTime<Utc>) -> bool {
        if self.mock_only && !draft.is_mock() {
            return false;
        }
        if self.completed_only && !draft.is_complete() {
            return false;
        }
        match self.within_days {
            Some(days) => draft
                .created_at()
                .is_some_and(|created| (now - created).num_days() <= days),
            None => true,
        }
    }
}

/// A draft found through discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftListing {
    pub draft_id: String,
    pub created: Option<DateTime<Utc>>,
    pub status: String,
    pub draft_type: String,
    pub season: u16,
    pub league_id: Option<String>,
    pub name: Option<String>,
    pub is_mock: bool,
}

impl DraftListing {
    fn from_draft(draft: &SleeperDraft, season: u16) -> Self {
        Self {
            draft_id: draft.draft_id.clone(),
            created: draft.created_at(),
            status: draft.status().to_string(),
            draft_type: draft.draft_type().to_string(),
            season,
            league_id: draft.league_id.clone(),
            name: draft.metadata.as_ref().and_then(|m| m.name.clone()),
            is_mock: draft.is_mock(),
        }
    }

    pub fn days_ago(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created.map(|c| (now - c).num_days())
    }

    pub fn is_complete(&self) -> bool {
        self.status.eq_ignore_ascii_case("complete")
    }
}

/// Outcome of a batch import.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    /// Draft id and number of picks kept.
    pub imported: Vec<(String, usize)>,
    /// Already in the store.
    pub skipped: Vec<String>,
    /// Draft id and the error that stopped it.
    pub failed: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Pick translation
// ---------------------------------------------------------------------------

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn player_name(player_id: &str, raw: &RawPick, players: &PlayerDirectory) -> String {
    if let Some(info) = players.get(player_id) {
        let joined = format!(
            "{} {}",
            info.first_name.as_deref().unwrap_or(""),
            info.last_name.as_deref().unwrap_or("")
        );
        if let Some(name) = non_blank(Some(&joined)).or(non_blank(info.full_name.as_deref())) {
            return name.to_string();
        }
    }
    if let Some(meta) = &raw.metadata {
        let joined = format!(
            "{} {}",
            meta.first_name.as_deref().unwrap_or(""),
            meta.last_name.as_deref().unwrap_or("")
        );
        if let Some(name) = non_blank(Some(&joined)) {
            return name.to_string();
        }
    }
    format!("Unknown Player ({player_id})")
}

/// Translate raw picks into pick records and infer `(league_size, rounds)`.
///
/// League size is the number of distinct draft slots among the kept picks
/// and rounds the highest round seen. Pick-within-round is derived from the
/// overall pick and that league size.
pub fn translate_picks(raw: &[RawPick], players: &PlayerDirectory) -> (Vec<PickRecord>, u32, u32) {
    struct Kept<'a> {
        raw: &'a RawPick,
        player_id: &'a str,
        round: u32,
        pick_no: u32,
        slot: u32,
    }

    let mut kept = Vec::with_capacity(raw.len());
    for pick in raw {
        let Some(player_id) = non_blank(pick.player_id.as_deref()) else {
            info!("dropping pick {:?}: no player id", pick.pick_no);
            continue;
        };
        let (round, pick_no) = match (pick.round.unwrap_or(0), pick.pick_no.unwrap_or(0)) {
            (0, _) | (_, 0) => {
                warn!("dropping pick for player {player_id}: missing round or pick number");
                continue;
            }
            coords => coords,
        };
        kept.push(Kept {
            raw: pick,
            player_id,
            round,
            pick_no,
            slot: pick.draft_slot.unwrap_or(0),
        });
    }

    if kept.is_empty() {
        return (Vec::new(), DEFAULT_LEAGUE_SIZE, DEFAULT_ROUNDS);
    }

    let league_size = kept.iter().map(|k| k.slot).collect::<HashSet<_>>().len() as u32;
    let rounds = kept.iter().map(|k| k.round).max().unwrap_or(DEFAULT_ROUNDS);

    let picks = kept
        .iter()
        .map(|k| {
            let info = players.get(k.player_id);
            let meta = k.raw.metadata.as_ref();
            PickRecord {
                player_name: player_name(k.player_id, k.raw, players),
                player_id: Some(k.player_id.to_string()),
                position: non_blank(info.and_then(|i| i.position.as_deref()))
                    .or(non_blank(meta.and_then(|m| m.position.as_deref())))
                    .unwrap_or("UNK")
                    .to_string(),
                team: non_blank(info.and_then(|i| i.team.as_deref()))
                    .or(non_blank(meta.and_then(|m| m.team.as_deref())))
                    .unwrap_or("FA")
                    .to_string(),
                round_num: k.round,
                pick_num: slot_for(k.pick_no, league_size).map_or(k.slot, |(_, p)| p),
                overall_pick: k.pick_no,
                drafted_by_team: format!("Team{}", k.slot),
            }
        })
        .collect();

    (picks, league_size, rounds)
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

pub struct Importer<P: DraftPlatform> {
    platform: P,
    players: Option<PlayerDirectory>,
}

impl<P: DraftPlatform> Importer<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            players: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Fetch the player directory once per importer.
    async fn players(&mut self) -> Result<&PlayerDirectory, ImportError> {
        if self.players.is_none() {
            self.players = Some(self.platform.players().await?);
        }
        Ok(self.players.get_or_insert_with(PlayerDirectory::new))
    }

    /// Import one draft by its platform id.
    pub async fn import_draft(
        &mut self,
        draft_id: &str,
        keepers: &[String],
        notes: Option<String>,
    ) -> Result<DraftRecord, ImportError> {
        info!("Importing draft {draft_id}...");
        let raw = self.platform.draft_picks(draft_id).await?;
        if raw.is_empty() {
            return Err(ImportError::NoPicks(draft_id.to_string()));
        }

        let players = self.players().await?;
        let (picks, league_size, rounds) = translate_picks(&raw, players);
        if picks.len() < raw.len() {
            info!("Kept {} of {} picks from draft {draft_id}", picks.len(), raw.len());
        }

        let notes = notes.unwrap_or_else(|| format!("Imported from Sleeper draft {draft_id}"));
        let draft = DraftRecord::new(draft_id, Utc::now(), league_size, rounds)
            .with_keepers(keepers.to_vec())
            .with_picks(picks)
            .with_notes(notes);

        let conflicts = draft.drafted_keepers();
        if !conflicts.is_empty() {
            warn!("Draft {draft_id} lists drafted players as keepers: {conflicts:?}");
        }
        Ok(draft)
    }

    /// Drafts the user took part in across `seasons`, newest first.
    pub async fn discover(
        &self,
        username: &str,
        seasons: &[u16],
        filter: &DraftFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DraftListing>, ImportError> {
        let user = self
            .platform
            .user(username)
            .await?
            .ok_or_else(|| ImportError::UserNotFound(username.to_string()))?;
        info!("Finding drafts for {username} (user id {})", user.user_id);

        let mut listings = Vec::new();
        for &season in seasons {
            let drafts = self.platform.drafts(&user.user_id, season).await?;
            let before = listings.len();
            listings.extend(
                drafts
                    .iter()
                    .filter(|d| filter.accepts(d, now))
                    .map(|d| DraftListing::from_draft(d, season)),
            );
            info!(
                "Season {season}: {} drafts, {} after filtering",
                drafts.len(),
                listings.len() - before
            );
        }

        listings.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(listings)
    }

    /// Rosters of one of the user's leagues in `season`, each player matched
    /// against the league draft of the season before.
    ///
    /// `league` picks the first league whose name contains it (ignoring
    /// case); without it the first league is used. The prior draft is looked
    /// up on the league itself, then on the league it was renewed from. No
    /// prior draft is not an error: every player is reported undrafted.
    pub async fn keeper_report(
        &mut self,
        username: &str,
        season: u16,
        league: Option<&str>,
    ) -> Result<KeeperReport, ImportError> {
        let user = self
            .platform
            .user(username)
            .await?
            .ok_or_else(|| ImportError::UserNotFound(username.to_string()))?;

        let leagues = self.platform.leagues(&user.user_id, season).await?;
        let wanted = league.map(|l| l.trim().to_lowercase());
        let Some(league) = leagues.into_iter().find(|l| {
            wanted
                .as_deref()
                .map_or(true, |w| l.name().to_lowercase().contains(w))
        }) else {
            return Err(ImportError::LeagueNotFound {
                username: username.to_string(),
                season,
                filter: wanted.unwrap_or_else(|| "*".into()),
            });
        };
        info!("Building keeper report for {} ({})", league.name(), league.league_id);

        let rosters = self.platform.league_rosters(&league.league_id).await?;
        let members = self.platform.league_users(&league.league_id).await?;

        let draft_season = season.saturating_sub(1);
        let own_drafts = self.platform.league_drafts(&league.league_id).await?;
        let mut draft_id = select_prior_draft(&own_drafts, draft_season).map(|d| d.draft_id.clone());
        if draft_id.is_none() {
            if let Some(previous) = league.previous_league_id() {
                let drafts = self.platform.league_drafts(previous).await?;
                draft_id = select_prior_draft(&drafts, draft_season).map(|d| d.draft_id.clone());
            }
        }

        let picks = match &draft_id {
            Some(id) => self.platform.draft_picks(id).await?,
            None => {
                warn!("No {draft_season} draft found for league {}; all players undrafted", league.name());
                Vec::new()
            }
        };

        let players = self.players().await?;
        Ok(build_keeper_report(
            &league,
            season,
            draft_season,
            draft_id,
            &rosters,
            &members,
            &picks,
            players,
        ))
    }

    /// Import each id into `store`, skipping ids the store already holds.
    ///
    /// Platform failures for one draft are recorded in the report and the
    /// batch continues; a store write failure aborts the batch.
    pub async fn import_into<R: DraftRepository + ?Sized>(
        &mut self,
        store: &mut R,
        draft_ids: &[String],
        keepers: &[String],
        notes: Option<String>,
    ) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();
        for (i, draft_id) in draft_ids.iter().enumerate() {
            if store.contains(draft_id) {
                info!("Draft {draft_id} already stored; skipping");
                report.skipped.push(draft_id.clone());
                continue;
            }
            let note = notes.as_ref().map(|n| {
                if draft_ids.len() > 1 {
                    format!("{n} #{}", i + 1)
                } else {
                    n.clone()
                }
            });
            match self.import_draft(draft_id, keepers, note).await {
                Ok(draft) => {
                    let picks = draft.picks.len();
                    store.add(draft)?;
                    report.imported.push((draft_id.clone(), picks));
                }
                Err(e) => {
                    warn!("Error importing {draft_id}: {e}");
                    report.failed.push((draft_id.clone(), e.to_string()));
                }
            }
        }
        Ok(report)
    }
}
