//! Displayed tags and the per-context tag set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use refmark_primitives::{DocumentId, SnapshotSpan, TextPosition};

use crate::resolver::HighlightSpanKind;

/// Visual category of a displayed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
	Definition,
	Reference,
}

impl From<HighlightSpanKind> for TagKind {
	fn from(kind: HighlightSpanKind) -> Self {
		match kind {
			HighlightSpanKind::Definition => TagKind::Definition,
			HighlightSpanKind::Reference => TagKind::Reference,
			// Writes and unclassified occurrences render as plain references.
			HighlightSpanKind::WrittenReference | HighlightSpanKind::None => TagKind::Reference,
		}
	}
}

/// A tag as shown on screen, in current snapshot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlightTag {
	pub document: DocumentId,
	pub span: SnapshotSpan,
	pub kind: TagKind,
}

/// Tags for one highlight context, keyed by document and snapshot span.
///
/// Iteration is ordered by document, then snapshot, then range start, which
/// is also the order highlight navigation walks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
	tags: BTreeMap<(DocumentId, SnapshotSpan), TagKind>,
}

impl TagSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.tags.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}

	/// Inserts a tag. When the same span is already tagged, a definition is
	/// never downgraded to a reference.
	pub fn insert(&mut self, tag: HighlightTag) {
		match self.tags.entry((tag.document, tag.span)) {
			Entry::Vacant(slot) => {
				slot.insert(tag.kind);
			}
			Entry::Occupied(mut slot) => {
				if *slot.get() != TagKind::Definition {
					slot.insert(tag.kind);
				}
			}
		}
	}

	pub fn remove(&mut self, tag: &HighlightTag) -> bool {
		if !self.contains(tag) {
			return false;
		}
		self.tags.remove(&(tag.document, tag.span)).is_some()
	}

	pub fn contains(&self, tag: &HighlightTag) -> bool {
		self.tags.get(&(tag.document, tag.span)) == Some(&tag.kind)
	}

	/// Returns the tag whose span contains `position`, if any.
	pub fn containing(&self, position: TextPosition) -> Option<HighlightTag> {
		self.iter().find(|tag| tag.span.contains(position))
	}

	pub fn iter(&self) -> impl Iterator<Item = HighlightTag> + '_ {
		self.tags.iter().map(|(&(document, span), &kind)| HighlightTag { document, span, kind })
	}
}

impl FromIterator<HighlightTag> for TagSet {
	fn from_iter<I: IntoIterator<Item = HighlightTag>>(iter: I) -> Self {
		let mut set = TagSet::new();
		for tag in iter {
			set.insert(tag);
		}
		set
	}
}

#[cfg(test)]
mod tests {
	use refmark_primitives::{SnapshotId, TextRange};
	use rstest::rstest;

	use super::*;

	fn tag(start: usize, end: usize, kind: TagKind) -> HighlightTag {
		HighlightTag {
			document: DocumentId(1),
			span: SnapshotSpan::new(SnapshotId(1), TextRange::new(start, end)),
			kind,
		}
	}

	#[rstest]
	#[case(HighlightSpanKind::Definition, TagKind::Definition)]
	#[case(HighlightSpanKind::Reference, TagKind::Reference)]
	#[case(HighlightSpanKind::WrittenReference, TagKind::Reference)]
	#[case(HighlightSpanKind::None, TagKind::Reference)]
	fn resolver_kind_maps_to_tag_kind(#[case] kind: HighlightSpanKind, #[case] expected: TagKind) {
		assert_eq!(TagKind::from(kind), expected);
	}

	#[test]
	fn definition_wins_over_reference_on_same_span() {
		let mut set = TagSet::new();
		set.insert(tag(0, 3, TagKind::Definition));
		set.insert(tag(0, 3, TagKind::Reference));
		assert_eq!(set.len(), 1);
		assert!(set.contains(&tag(0, 3, TagKind::Definition)));

		let mut set = TagSet::new();
		set.insert(tag(0, 3, TagKind::Reference));
		set.insert(tag(0, 3, TagKind::Definition));
		assert!(set.contains(&tag(0, 3, TagKind::Definition)));
	}

	#[test]
	fn containing_uses_end_exclusive_spans() {
		let set: TagSet = [tag(0, 3, TagKind::Definition), tag(11, 14, TagKind::Reference)].into_iter().collect();
		let at = |offset| TextPosition::new(SnapshotId(1), offset);

		assert_eq!(set.containing(at(12)), Some(tag(11, 14, TagKind::Reference)));
		assert_eq!(set.containing(at(0)), Some(tag(0, 3, TagKind::Definition)));
		assert_eq!(set.containing(at(3)), None);
		assert_eq!(set.containing(TextPosition::new(SnapshotId(2), 12)), None);
	}

	#[test]
	fn remove_requires_matching_kind() {
		let mut set: TagSet = [tag(0, 3, TagKind::Definition)].into_iter().collect();
		assert!(!set.remove(&tag(0, 3, TagKind::Reference)));
		assert!(set.remove(&tag(0, 3, TagKind::Definition)));
		assert!(set.is_empty());
	}

	#[test]
	fn iteration_is_in_document_order() {
		let set: TagSet = [tag(11, 14, TagKind::Reference), tag(0, 3, TagKind::Definition)].into_iter().collect();
		let starts: Vec<_> = set.iter().map(|t| t.span.range.start).collect();
		assert_eq!(starts, vec![0, 11]);
	}
}
