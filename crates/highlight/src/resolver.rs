//! The reference-resolution service consumed by the engine.

use std::collections::BTreeSet;

use async_trait::async_trait;
use refmark_primitives::{DocumentId, TextPosition, TextRange};
use tokio_util::sync::CancellationToken;

use crate::error::ResolveError;

/// Classification of one related occurrence as reported by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightSpanKind {
	/// Unclassified occurrence.
	#[default]
	None,
	/// The symbol's declaration site.
	Definition,
	/// A read of the symbol.
	Reference,
	/// A write to the symbol.
	WrittenReference,
}

/// One related occurrence in a document, in that document's latest snapshot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightSpan {
	pub range: TextRange,
	pub kind: HighlightSpanKind,
}

impl HighlightSpan {
	pub const fn new(range: TextRange, kind: HighlightSpanKind) -> Self {
		Self { range, kind }
	}
}

/// All occurrences the resolver found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHighlights {
	pub document: DocumentId,
	pub spans: Vec<HighlightSpan>,
}

/// Finds the occurrences related to the symbol at a position.
///
/// Calls may be slow, and identical calls in quick succession are not
/// assumed to be deduplicated. Implementations should stop work once
/// `cancel` fires; any result they still return is discarded.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
	async fn document_highlights(
		&self,
		document: DocumentId,
		position: TextPosition,
		candidates: &BTreeSet<DocumentId>,
		cancel: CancellationToken,
	) -> Result<Option<Vec<DocumentHighlights>>, ResolveError>;
}
