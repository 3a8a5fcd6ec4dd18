// Whole-draft record: metadata plus the ordered picks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::pick::PickRecord;

/// One recorded mock draft.
///
/// `picks` need not cover `league_size * rounds` slots; partially recorded
/// drafts are stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Identifier, normally the source platform's draft id.
    pub draft_id: String,
    /// When the draft took place (or was recorded).
    #[serde(with = "iso_timestamp")]
    pub draft_date: DateTime<Utc>,
    /// Number of teams.
    pub league_size: u32,
    /// Number of rounds.
    pub rounds: u32,
    /// Players kept by teams and therefore removed from this draft's pool.
    #[serde(default)]
    pub keepers: Vec<String>,
    /// Picks in recorded order.
    #[serde(default)]
    pub picks: Vec<PickRecord>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl DraftRecord {
    pub fn new(
        draft_id: impl Into<String>,
        draft_date: DateTime<Utc>,
        league_size: u32,
        rounds: u32,
    ) -> Self {
        Self {
            draft_id: draft_id.into(),
            draft_date,
            league_size,
            rounds,
            keepers: Vec::new(),
            picks: Vec::new(),
            notes: None,
        }
    }

    pub fn with_keepers(mut self, keepers: Vec<String>) -> Self {
        self.keepers = keepers;
        self
    }

    pub fn with_picks(mut self, picks: Vec<PickRecord>) -> Self {
        self.picks = picks;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Slots a fully recorded draft would have.
    pub fn expected_picks(&self) -> usize {
        self.league_size as usize * self.rounds as usize
    }

    /// Whether fewer picks were recorded than the draft has slots.
    pub fn is_partial(&self) -> bool {
        self.picks.len() < self.expected_picks()
    }

    /// Whether `player_name` was a keeper (off the board) in this draft.
    pub fn is_keeper(&self, player_name: &str) -> bool {
        self.keepers.iter().any(|k| k == player_name)
    }

    /// Keepers that nonetheless show up among the picks. Keepers are expected
    /// never to be drafted, so a non-empty result points at bad input.
    pub fn drafted_keepers(&self) -> Vec<&str> {
        let keepers: HashSet<&str> = self.keepers.iter().map(String::as_str).collect();
        self.picks
            .iter()
            .map(|p| p.player_name.as_str())
            .filter(|name| keepers.contains(name))
            .collect()
    }
}

/// ISO-8601 (RFC 3339) timestamps. Naive timestamps without an offset, as
/// written by older tracker files, are read as UTC.
mod iso_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
