//! Next/previous highlight navigation.

use refmark_primitives::TextPosition;

use crate::tags::{HighlightTag, TagSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
	Next,
	Previous,
}

/// Finds the tag to move the caret to from the tag containing `caret`.
///
/// Walks tags in document order and wraps at either end. Returns `None`
/// when the caret is not inside a tag or there is nowhere else to go.
pub fn navigate(tags: &TagSet, caret: TextPosition, direction: NavDirection) -> Option<HighlightTag> {
	let ordered: Vec<HighlightTag> = tags.iter().collect();
	if ordered.len() < 2 {
		return None;
	}
	let current = ordered.iter().position(|tag| tag.span.contains(caret))?;
	let target = match direction {
		NavDirection::Next => (current + 1) % ordered.len(),
		NavDirection::Previous => (current + ordered.len() - 1) % ordered.len(),
	};
	Some(ordered[target])
}
