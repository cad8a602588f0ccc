//! Core coordinate types: identifiers, byte ranges, and snapshot-relative spans.

/// Identifier types for documents, views, and snapshots.
pub mod ids;
/// Half-open byte ranges.
pub mod range;
/// Snapshot-relative positions and spans.
pub mod span;

pub use ids::{DocumentId, SnapshotId, ViewId};
pub use range::TextRange;
pub use span::{SnapshotSpan, TextPosition};
