// Append-only draft store, persisted as a JSON array of draft records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::draft::record::DraftRecord;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write draft store {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize draft store: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Repository interface
// ---------------------------------------------------------------------------

/// Ordered, append-only collection of draft records.
///
/// Records are kept in insertion order, never in draft-date order. Nothing
/// is deduplicated: appending a record whose id is already present keeps
/// both, and [`DraftRepository::find`] resolves to the later one.
pub trait DraftRepository {
    /// All records in insertion order.
    fn drafts(&self) -> &[DraftRecord];

    /// Append one record and persist the whole collection.
    fn add(&mut self, draft: DraftRecord) -> Result<(), StoreError>;

    /// Persist the whole collection, replacing whatever was stored before.
    fn save(&self) -> Result<(), StoreError>;

    fn len(&self) -> usize {
        self.drafts().len()
    }

    fn is_empty(&self) -> bool {
        self.drafts().is_empty()
    }

    /// Most recently appended record with the given id.
    fn find(&self, draft_id: &str) -> Option<&DraftRecord> {
        self.drafts().iter().rev().find(|d| d.draft_id == draft_id)
    }

    fn contains(&self, draft_id: &str) -> bool {
        self.find(draft_id).is_some()
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// How the backing file was read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file existed; the store starts empty.
    Fresh,
    /// The file was read successfully.
    Loaded(usize),
    /// The file existed but could not be read or parsed; the store starts
    /// empty and the next save replaces it.
    Recovered(String),
}

/// Draft store backed by a single JSON file.
pub struct JsonDraftStore {
    path: PathBuf,
    drafts: Vec<DraftRecord>,
    status: LoadStatus,
}

impl JsonDraftStore {
    /// Read every record from `path`.
    ///
    /// Never fails: a missing file yields an empty store, and unreadable or
    /// malformed content yields an empty store plus a warning. Mock-draft
    /// data can always be re-imported.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (drafts, status) = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<DraftRecord>>(&text) {
                Ok(drafts) => {
                    info!("Loaded {} mock drafts from {}", drafts.len(), path.display());
                    let n = drafts.len();
                    (drafts, LoadStatus::Loaded(n))
                }
                Err(e) => {
                    warn!("Draft store {} is malformed ({e}); starting with an empty dataset", path.display());
                    (Vec::new(), LoadStatus::Recovered(e.to_string()))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No draft store at {}; starting fresh", path.display());
                (Vec::new(), LoadStatus::Fresh)
            }
            Err(e) => {
                warn!("Failed to read draft store {} ({e}); starting with an empty dataset", path.display());
                (Vec::new(), LoadStatus::Recovered(e.to_string()))
            }
        };

        Self {
            path,
            drafts,
            status,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.status
    }
}

impl DraftRepository for JsonDraftStore {
    fn drafts(&self) -> &[DraftRecord] {
        &self.drafts
    }

    fn add(&mut self, draft: DraftRecord) -> Result<(), StoreError> {
        if self.contains(&draft.draft_id) {
            warn!("Draft id {} is already stored; appending another copy", draft.draft_id);
        }
        info!("Added mock draft {} with {} picks", draft.draft_id, draft.picks.len());
        self.drafts.push(draft);
        self.save()
    }

    /// Serialize the full set to a sibling temp file, then rename it over the
    /// backing file so a failed write never leaves a truncated store behind.
    fn save(&self) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.drafts)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        info!("Saved {} mock drafts to {}", self.drafts.len(), self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store that keeps records in memory only. `save` is a no-op.
#[derive(Debug, Default, Clone)]
pub struct MemoryDraftStore {
    drafts: Vec<DraftRecord>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_drafts(drafts: Vec<DraftRecord>) -> Self {
        Self { drafts }
    }
}

impl DraftRepository for MemoryDraftStore {
    fn drafts(&self) -> &[DraftRecord] {
        &self.drafts
    }

    fn add(&mut self, draft: DraftRecord) -> Result<(), StoreError> {
        self.drafts.push(draft);
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
