use serde::{Deserialize, Serialize};

/// A byte offset into a snapshot's text.
pub type ByteIdx = usize;

/// A half-open byte range `[start, end)` within one snapshot.
///
/// Ranges are ordered by start, then end, so sorted collections of ranges
/// iterate in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextRange {
	/// First byte covered by the range.
	pub start: ByteIdx,
	/// One past the last byte covered by the range.
	pub end: ByteIdx,
}

impl TextRange {
	/// Creates a range, swapping the bounds if they are reversed.
	pub fn new(start: ByteIdx, end: ByteIdx) -> Self {
		if end < start { Self { start: end, end: start } } else { Self { start, end } }
	}

	/// Returns the length of the range in bytes.
	#[inline]
	pub const fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns true for a zero-width range.
	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if `offset` lies inside the range.
	///
	/// The end is exclusive: a caret sitting right after a word is not inside it.
	#[inline]
	pub const fn contains(&self, offset: ByteIdx) -> bool {
		self.start <= offset && offset < self.end
	}

	/// Returns true if `other` lies entirely within this range.
	#[inline]
	pub const fn covers(&self, other: &TextRange) -> bool {
		self.start <= other.start && other.end <= self.end
	}
}
