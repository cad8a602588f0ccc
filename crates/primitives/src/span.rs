use serde::{Deserialize, Serialize};

use crate::ids::SnapshotId;
use crate::range::{ByteIdx, TextRange};

/// A caret-like point in one concrete snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextPosition {
	pub snapshot: SnapshotId,
	pub offset: ByteIdx,
}

impl TextPosition {
	pub const fn new(snapshot: SnapshotId, offset: ByteIdx) -> Self {
		Self { snapshot, offset }
	}
}

/// A byte range anchored to the snapshot it was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotSpan {
	pub snapshot: SnapshotId,
	pub range: TextRange,
}

impl SnapshotSpan {
	pub const fn new(snapshot: SnapshotId, range: TextRange) -> Self {
		Self { snapshot, range }
	}

	/// Returns true if `position` is in the same snapshot and inside the range.
	///
	/// Positions from another snapshot never match, even at equal offsets.
	#[inline]
	pub fn contains(&self, position: TextPosition) -> bool {
		self.snapshot == position.snapshot && self.range.contains(position.offset)
	}

	/// Start of the span as a position.
	pub const fn start(&self) -> TextPosition {
		TextPosition::new(self.snapshot, self.range.start)
	}
}
