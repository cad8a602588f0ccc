//! Minimal add/remove transitions between tag sets.

use crate::tags::{HighlightTag, TagSet};

/// What the engine decided to display after a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	/// Keep every displayed tag unchanged.
	Preserve,
	/// Display exactly this set.
	Replace(TagSet),
	/// Display nothing.
	Clear,
}

/// One atomic tag update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
	pub removed: Vec<HighlightTag>,
	pub added: Vec<HighlightTag>,
}

impl TagDiff {
	pub fn is_empty(&self) -> bool {
		self.removed.is_empty() && self.added.is_empty()
	}
}

/// Computes the smallest diff that turns `current` into the decided set.
///
/// Tags present on both sides with the same kind are left alone. A kind
/// change on one span shows up as a removal plus an addition.
pub fn reconcile(current: &TagSet, decision: &Decision) -> TagDiff {
	match decision {
		Decision::Preserve => TagDiff::default(),
		Decision::Clear => TagDiff {
			removed: current.iter().collect(),
			added: Vec::new(),
		},
		Decision::Replace(target) => TagDiff {
			removed: current.iter().filter(|tag| !target.contains(tag)).collect(),
			added: target.iter().filter(|tag| !current.contains(tag)).collect(),
		},
	}
}

impl TagSet {
	/// Applies a diff produced by [`reconcile`] against this set.
	pub fn apply(&mut self, diff: &TagDiff) {
		for tag in &diff.removed {
			self.remove(tag);
		}
		for tag in &diff.added {
			self.insert(*tag);
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use refmark_primitives::{DocumentId, SnapshotId, SnapshotSpan, TextRange};

	use super::*;
	use crate::tags::TagKind;

	fn tag(start: usize, end: usize, kind: TagKind) -> HighlightTag {
		HighlightTag {
			document: DocumentId(1),
			span: SnapshotSpan::new(SnapshotId(1), TextRange::new(start, end)),
			kind,
		}
	}

	fn set(tags: &[HighlightTag]) -> TagSet {
		tags.iter().copied().collect()
	}

	#[test]
	fn preserve_is_empty_diff() {
		let current = set(&[tag(0, 3, TagKind::Definition)]);
		assert!(reconcile(&current, &Decision::Preserve).is_empty());
	}

	#[test]
	fn clear_removes_everything() {
		let current = set(&[tag(0, 3, TagKind::Definition), tag(11, 14, TagKind::Reference)]);
		let diff = reconcile(&current, &Decision::Clear);
		assert_eq!(diff.removed, vec![tag(0, 3, TagKind::Definition), tag(11, 14, TagKind::Reference)]);
		assert!(diff.added.is_empty());
	}

	#[test]
	fn replace_touches_only_changed_tags() {
		let current = set(&[tag(0, 3, TagKind::Definition), tag(11, 14, TagKind::Reference)]);
		let target = set(&[tag(0, 3, TagKind::Definition), tag(20, 23, TagKind::Reference)]);

		let diff = reconcile(&current, &Decision::Replace(target.clone()));
		assert_eq!(diff.removed, vec![tag(11, 14, TagKind::Reference)]);
		assert_eq!(diff.added, vec![tag(20, 23, TagKind::Reference)]);

		let mut applied = current;
		applied.apply(&diff);
		assert_eq!(applied, target);
	}

	#[test]
	fn kind_change_is_remove_then_add() {
		let current = set(&[tag(0, 3, TagKind::Reference)]);
		let target = set(&[tag(0, 3, TagKind::Definition)]);

		let diff = reconcile(&current, &Decision::Replace(target.clone()));
		assert_eq!(diff.removed, vec![tag(0, 3, TagKind::Reference)]);
		assert_eq!(diff.added, vec![tag(0, 3, TagKind::Definition)]);

		let mut applied = current;
		applied.apply(&diff);
		assert_eq!(applied, target);
	}

	#[test]
	fn replace_with_identical_set_is_empty() {
		let current = set(&[tag(0, 3, TagKind::Definition)]);
		assert!(reconcile(&current, &Decision::Replace(current.clone())).is_empty());
	}
}
