//! Analytics invariants:
//!
//! 1. Analytics are derived by the remote service, never computed here
//! 2. Counts are a snapshot as of the fetch and may be stale
//! 3. Stale analytics are acceptable until the next refetch

pub mod entity;
pub use entity::{AnalyticsSummary, CategoryGroup};
