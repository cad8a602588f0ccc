use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a logical document, independent of how many views project it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl DocumentId {
	/// Generates a new unique document ID.
	pub fn next() -> Self {
		Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "doc#{}", self.0)
	}
}

/// Identity of one on-screen view (split, pane, or projection) over a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl ViewId {
	/// Generates a new unique view ID.
	pub fn next() -> Self {
		Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "view#{}", self.0)
	}
}

/// Identity of an immutable buffer text version.
///
/// Every edit produces a new snapshot. Spans are only meaningful relative to the
/// snapshot they were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub u64);

impl SnapshotId {
	/// Generates a new unique snapshot ID.
	pub fn next() -> Self {
		Self(NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for SnapshotId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "snap#{}", self.0)
	}
}
