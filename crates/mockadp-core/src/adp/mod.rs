// ADP engine: identity resolution, aggregation, and derived analysis.

pub mod aggregate;
pub mod analysis;
pub mod identity;
