// Raw Sleeper API payloads. Only the fields the importer reads are modeled;
// everything else in the responses is ignored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /user/{username}`
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One entry of `GET /user/{user_id}/drafts/nfl/{season}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperDraft {
    pub draft_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub draft_type: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub settings: Option<DraftSettings>,
    #[serde(default)]
    pub metadata: Option<DraftMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftSettings {
    #[serde(default)]
    pub teams: Option<u32>,
    #[serde(default)]
    pub rounds: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scoring_type: Option<String>,
}

impl SleeperDraft {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn draft_type(&self) -> &str {
        self.draft_type.as_deref().unwrap_or("unknown")
    }

    pub fn is_complete(&self) -> bool {
        self.status().eq_ignore_ascii_case("complete")
    }

    /// Mock drafts are typed as mock/practice or are not attached to a
    /// league.
    pub fn is_mock(&self) -> bool {
        let kind = self.draft_type().to_lowercase();
        let no_league = self
            .league_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty() || id == "0");
        kind.contains("mock") || kind.contains("practice") || no_league
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(DateTime::from_timestamp_millis)
    }
}

/// One entry of `GET /draft/{draft_id}/picks`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPick {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub round: Option<u32>,
    /// Draft-wide pick number.
    #[serde(default)]
    pub pick_no: Option<u32>,
    /// Seat of the drafting team.
    #[serde(default)]
    pub draft_slot: Option<u32>,
    #[serde(default)]
    pub picked_by: Option<String>,
    #[serde(default)]
    pub metadata: Option<PickMetadata>,
}

/// Player details Sleeper embeds in each pick.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PickMetadata {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

/// One entry of the `GET /players/nfl` directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

/// Player id → details.
pub type PlayerDirectory = HashMap<String, PlayerInfo>;

/// One entry of `GET /user/{user_id}/leagues/nfl/{season}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperLeague {
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    /// Same league in the prior season, when it was renewed.
    #[serde(default)]
    pub previous_league_id: Option<String>,
}

impl SleeperLeague {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed league")
    }

    pub fn previous_league_id(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "0")
    }
}

/// One entry of `GET /league/{league_id}/rosters`.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    #[serde(default)]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Player ids; `null` for an empty roster.
    #[serde(default)]
    pub players: Option<Vec<String>>,
}

/// One entry of `GET /league/{league_id}/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueMember {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<MemberMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}
