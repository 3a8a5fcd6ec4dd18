// Sleeper draft-platform integration: read-only HTTP client, raw payload
// models, draft discovery, translation of raw picks into draft records, and
// league keeper lookups.

pub mod client;
pub mod error;
pub mod importer;
pub mod keepers;
pub mod models;

pub use client::{DraftPlatform, SleeperClient};
pub use error::ImportError;
pub use importer::{DraftFilter, DraftListing, ImportReport, Importer};
pub use keepers::{KeeperReport, KeeperTeam, PriorPick, RosterPlayer};
