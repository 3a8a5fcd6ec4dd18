use mockadp_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("Sleeper user not found: {0}")]
    UserNotFound(String),

    #[error("no league for {username} in {season} matching '{filter}'")]
    LeagueNotFound {
        username: String,
        season: u16,
        filter: String,
    },

    #[error("no picks found for draft {0}")]
    NoPicks(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
