//! Caret and scope resolution.
//!
//! Turns the caret of one view into a [`HighlightRequest`]: the caret's
//! position in a concrete snapshot, plus every span, across all views that
//! project the same logical document, that may receive tags. Spans from
//! every view are included so navigation can move between occurrences that
//! live in different views.

use std::collections::BTreeSet;

use refmark_primitives::{DocumentId, SnapshotSpan, TextPosition, ViewId};
use smallvec::SmallVec;

use crate::config::HighlightConfig;
use crate::error::ScopeError;
use crate::host::EditorHost;

/// A span that may receive tags, with the document it was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpan {
	pub document: DocumentId,
	pub span: SnapshotSpan,
}

/// An immutable description of one recompute, built once per trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRequest {
	/// View whose caret produced the request.
	pub view: ViewId,
	pub caret: TextPosition,
	/// Document the caret's snapshot belongs to.
	pub document: DocumentId,
	/// Spans eligible for tags, deduplicated across views sharing a snapshot.
	pub candidate_spans: SmallVec<[CandidateSpan; 2]>,
	/// Documents behind `candidate_spans`, always including `document`.
	pub candidate_documents: BTreeSet<DocumentId>,
}

/// Resolves carets into highlight requests, filtering views by content type.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
	config: HighlightConfig,
}

impl HighlightRequest {
	/// Eligible spans projected from `document`.
	pub fn spans_of(&self, document: DocumentId) -> impl Iterator<Item = &SnapshotSpan> + '_ {
		self.candidate_spans.iter().filter(move |c| c.document == document).map(|c| &c.span)
	}
}

impl ScopeResolver {
	pub fn new(config: &HighlightConfig) -> Self {
		Self { config: config.clone() }
	}

	pub fn resolve(&self, host: &dyn EditorHost, view: ViewId) -> Result<HighlightRequest, ScopeError> {
		let caret = host.caret(view).ok_or(ScopeError::NoCaret(view))?;
		if !self.config.accepts_content_type(&caret.content_type) {
			return Err(ScopeError::UnsupportedContent(caret.content_type));
		}

		let snapshot = caret.position.snapshot;
		let document = host.document_for_snapshot(snapshot).ok_or(ScopeError::NoDocument(snapshot))?;

		let mut candidate_spans: SmallVec<[CandidateSpan; 2]> = SmallVec::new();
		for projected in host.views_of(document) {
			if !self.config.accepts_content_type(&projected.content_type) {
				continue;
			}
			let span = SnapshotSpan::new(projected.snapshot, projected.extent);
			if candidate_spans.iter().any(|c| c.span == span) {
				continue;
			}
			candidate_spans.push(CandidateSpan { document, span });
		}
		let mut candidate_documents: BTreeSet<DocumentId> = candidate_spans.iter().map(|c| c.document).collect();
		candidate_documents.insert(document);

		Ok(HighlightRequest {
			view,
			caret: caret.position,
			document,
			candidate_spans,
			candidate_documents,
		})
	}
}
