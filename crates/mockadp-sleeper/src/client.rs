// Read-only Sleeper HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ImportError;
use crate::models::{
    LeagueMember, PlayerDirectory, RawPick, SleeperDraft, SleeperLeague, SleeperRoster, SleeperUser,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLEEPER_API_URL: &str = "https://api.sleeper.app/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Platform interface
// ---------------------------------------------------------------------------

/// The lookups the importer needs from a draft platform.
#[async_trait]
pub trait DraftPlatform: Send + Sync {
    /// Resolve a username. `Ok(None)` when the user does not exist.
    async fn user(&self, username: &str) -> Result<Option<SleeperUser>, ImportError>;

    /// Every draft the user took part in for one NFL season.
    async fn drafts(&self, user_id: &str, season: u16) -> Result<Vec<SleeperDraft>, ImportError>;

    /// All picks of one draft, in pick order.
    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<RawPick>, ImportError>;

    /// The full NFL player directory (several megabytes).
    async fn players(&self) -> Result<PlayerDirectory, ImportError>;

    /// Leagues the user belongs to for one NFL season.
    async fn leagues(&self, user_id: &str, season: u16) -> Result<Vec<SleeperLeague>, ImportError>;

    /// Current rosters of a league.
    async fn league_rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>, ImportError>;

    /// Members of a league.
    async fn league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>, ImportError>;

    /// Drafts held by a league.
    async fn league_drafts(&self, league_id: &str) -> Result<Vec<SleeperDraft>, ImportError>;
}

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ImportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ImportError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    /// Client for the public Sleeper API with the default timeout.
    pub fn public() -> Result<Self, ImportError> {
        Self::new(SLEEPER_API_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ImportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ImportError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ImportError::Decode { url, source })
    }
}

#[async_trait]
impl DraftPlatform for SleeperClient {
    async fn user(&self, username: &str) -> Result<Option<SleeperUser>, ImportError> {
        // Unknown usernames come back as `200 null`.
        self.get_json(&format!("/user/{username}")).await
    }

    async fn drafts(&self, user_id: &str, season: u16) -> Result<Vec<SleeperDraft>, ImportError> {
        let drafts: Option<Vec<SleeperDraft>> =
            self.get_json(&format!("/user/{user_id}/drafts/nfl/{season}")).await?;
        Ok(drafts.unwrap_or_default())
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<RawPick>, ImportError> {
        let picks: Option<Vec<RawPick>> = self.get_json(&format!("/draft/{draft_id}/picks")).await?;
        Ok(picks.unwrap_or_default())
    }

    async fn players(&self) -> Result<PlayerDirectory, ImportError> {
        info!("Loading NFL players from Sleeper API...");
        let players: PlayerDirectory = self.get_json("/players/nfl").await?;
        info!("Loaded {} players", players.len());
        Ok(players)
    }

    async fn leagues(&self, user_id: &str, season: u16) -> Result<Vec<SleeperLeague>, ImportError> {
        let leagues: Option<Vec<SleeperLeague>> =
            self.get_json(&format!("/user/{user_id}/leagues/nfl/{season}")).await?;
        Ok(leagues.unwrap_or_default())
    }

    async fn league_rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>, ImportError> {
        let rosters: Option<Vec<SleeperRoster>> =
            self.get_json(&format!("/league/{league_id}/rosters")).await?;
        Ok(rosters.unwrap_or_default())
    }

    async fn league_users(&self, league_id: &str) -> Result<Vec<LeagueMember>, ImportError> {
        let users: Option<Vec<LeagueMember>> = self.get_json(&format!("/league/{league_id}/users")).await?;
        Ok(users.unwrap_or_default())
    }

    async fn league_drafts(&self, league_id: &str) -> Result<Vec<SleeperDraft>, ImportError> {
        let drafts: Option<Vec<SleeperDraft>> =
            self.get_json(&format!("/league/{league_id}/drafts")).await?;
        Ok(drafts.unwrap_or_default())
    }
}
