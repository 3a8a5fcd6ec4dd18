// Library root: draft records, the file-backed draft store, the ADP
// aggregation engine and the tabular exporter.

pub mod adp;
pub mod draft;
pub mod export;
pub mod manual;
pub mod store;

pub use adp::aggregate::{calculate_adp, calculate_adp_with, AdpAggregate, AdpTable, TieBreak};
pub use adp::identity::{IdentityResolver, IdentityStrategy};
pub use draft::pick::PickRecord;
pub use draft::record::DraftRecord;
pub use store::{DraftRepository, JsonDraftStore, MemoryDraftStore, StoreError};
