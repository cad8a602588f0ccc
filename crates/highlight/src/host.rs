//! Boundary traits toward the hosting editor.

use refmark_primitives::{DocumentId, SnapshotId, TextPosition, TextRange, ViewId};

use crate::reconcile::TagDiff;

/// The caret of one view, resolved into a concrete snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretPoint {
	pub position: TextPosition,
	/// Content type of the buffer the caret sits in.
	pub content_type: String,
}

/// One view's projection of a buffer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedView {
	pub view: ViewId,
	pub snapshot: SnapshotId,
	pub content_type: String,
	/// Extent of the snapshot visible through this view.
	pub extent: TextRange,
}

/// Read-only access to editor state. Implementations must not block or yield.
///
/// The engine queries the host while holding its state lock, so
/// implementations must not call back into the engine.
pub trait EditorHost: Send + Sync {
	/// Returns the caret of `view`, or `None` when the view has no caret.
	fn caret(&self, view: ViewId) -> Option<CaretPoint>;

	/// Returns the logical document backing `snapshot`, or `None` when the
	/// snapshot is not associated with any workspace document.
	fn document_for_snapshot(&self, snapshot: SnapshotId) -> Option<DocumentId>;

	/// Returns every view currently projecting `document`.
	fn views_of(&self, document: DocumentId) -> Vec<ProjectedView>;

	/// Returns the live snapshot of `document`, or `None` if it is closed or
	/// no longer projected anywhere.
	fn current_snapshot(&self, document: DocumentId) -> Option<SnapshotId>;
}

/// Receives tag updates for rendering.
///
/// Updates are delivered while the engine's state lock is held.
/// Implementations must not call back into the engine, for example through
/// `displayed_tags`, and should hand the diff off rather than render inline.
pub trait TagSink: Send + Sync {
	/// Applies one atomic update: every tag in `diff.removed` disappears and
	/// every tag in `diff.added` appears together.
	fn apply(&self, view: ViewId, diff: &TagDiff);
}
