// Manually recorded drafts: a CSV pick list in draft order becomes a
// DraftRecord, with round and pick-in-round derived from the pick order.

use std::io::Read;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::draft::pick::PickRecord;
use crate::draft::record::DraftRecord;

#[derive(Debug, Error)]
pub enum ManualEntryError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `line` is the 1-based line in the input, blank lines included.
    #[error("line {line}: {message}")]
    Validation { line: u64, message: String },

    #[error("league size must be at least 1")]
    InvalidLeagueSize,

    #[error("rounds must be at least 1")]
    InvalidRounds,
}

/// Metadata for a manually entered draft.
#[derive(Debug, Clone)]
pub struct ManualDraft {
    /// Generated from the current time when `None`.
    pub draft_id: Option<String>,
    pub league_size: u32,
    pub rounds: u32,
    pub keepers: Vec<String>,
    pub notes: Option<String>,
}

/// Auto-generated draft id, e.g. `mock_20250812_193005`.
pub fn generate_draft_id() -> String {
    Utc::now().format("mock_%Y%m%d_%H%M%S").to_string()
}

/// `(round, pick_in_round)` for a 1-based overall pick. `None` when either
/// argument is zero.
pub fn slot_for(overall_pick: u32, league_size: u32) -> Option<(u32, u32)> {
    if overall_pick == 0 || league_size == 0 {
        return None;
    }
    let idx = overall_pick - 1;
    Some((idx / league_size + 1, idx % league_size + 1))
}

/// Parse `player_name,position,team[,drafted_by_team]` lines, one pick per
/// line in draft order. A leading `player_name` header line is ignored and
/// blank lines are skipped. Drafting team defaults to `Team{pick_in_round}`.
pub fn parse_pick_list<R: Read>(rdr: R, league_size: u32) -> Result<Vec<PickRecord>, ManualEntryError> {
    if league_size == 0 {
        return Err(ManualEntryError::InvalidLeagueSize);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut picks = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(index as u64 + 1, |p| p.line());

        if index == 0 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("player_name")) {
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 3 {
            return Err(ManualEntryError::Validation {
                line,
                message: "expected player_name,position,team[,drafted_by_team]".into(),
            });
        }

        let player_name = record[0].to_string();
        if player_name.is_empty() {
            return Err(ManualEntryError::Validation {
                line,
                message: "player name cannot be empty".into(),
            });
        }

        let overall_pick = picks.len() as u32 + 1;
        let (round_num, pick_num) =
            slot_for(overall_pick, league_size).ok_or(ManualEntryError::InvalidLeagueSize)?;
        let drafted_by_team = record
            .get(3)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Team{pick_num}"));

        picks.push(PickRecord {
            player_name,
            player_id: None,
            position: record[1].to_string(),
            team: record[2].to_string(),
            round_num,
            pick_num,
            overall_pick,
            drafted_by_team,
        });
    }
    Ok(picks)
}

/// Build a draft record from a pick list.
pub fn draft_from_pick_list<R: Read>(
    rdr: R,
    meta: ManualDraft,
    draft_date: DateTime<Utc>,
) -> Result<DraftRecord, ManualEntryError> {
    if meta.rounds == 0 {
        return Err(ManualEntryError::InvalidRounds);
    }
    let picks = parse_pick_list(rdr, meta.league_size)?;
    let draft_id = meta.draft_id.unwrap_or_else(generate_draft_id);

    let mut draft = DraftRecord::new(draft_id, draft_date, meta.league_size, meta.rounds)
        .with_keepers(meta.keepers)
        .with_picks(picks);
    draft.notes = meta.notes;
    Ok(draft)
}
