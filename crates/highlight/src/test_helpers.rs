//! In-memory collaborators for exercising the pipeline without an editor.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use refmark_primitives::{DocumentId, SnapshotId, TextPosition, TextRange, ViewId};
use ropey::Rope;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::ResolveError;
use crate::host::{CaretPoint, EditorHost, ProjectedView, TagSink};
use crate::reconcile::TagDiff;
use crate::resolver::{DocumentHighlights, HighlightSpan, HighlightSpanKind, ReferenceResolver};
use crate::tags::TagSet;

struct FakeDocument {
	text: Rope,
	snapshot: SnapshotId,
}

struct FakeView {
	document: DocumentId,
	content_type: String,
	/// `None` projects the whole document.
	extent: Option<TextRange>,
	caret: Option<usize>,
}

#[derive(Default)]
struct FakeState {
	documents: HashMap<DocumentId, FakeDocument>,
	views: BTreeMap<ViewId, FakeView>,
	detached: bool,
}

/// A tiny editor: rope-backed documents, views over them, and one caret per view.
///
/// Every edit produces a new snapshot for the edited document.
#[derive(Default)]
pub struct FakeEditor {
	state: Mutex<FakeState>,
}

impl FakeEditor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a document with one view showing all of it.
	pub fn open(&self, text: &str, content_type: &str) -> (DocumentId, ViewId) {
		let document = DocumentId::next();
		let view = ViewId::next();
		let mut state = self.state.lock();
		state.documents.insert(
			document,
			FakeDocument {
				text: Rope::from_str(text),
				snapshot: SnapshotId::next(),
			},
		);
		state.views.insert(
			view,
			FakeView {
				document,
				content_type: content_type.to_string(),
				extent: None,
				caret: None,
			},
		);
		(document, view)
	}

	/// Opens a second view over the same document as `view`.
	pub fn split(&self, view: ViewId) -> ViewId {
		let mut state = self.state.lock();
		let source = &state.views[&view];
		let split = FakeView {
			document: source.document,
			content_type: source.content_type.clone(),
			extent: source.extent,
			caret: None,
		};
		let id = ViewId::next();
		state.views.insert(id, split);
		id
	}

	/// Opens a view projecting only `extent` of `document`.
	pub fn project(&self, document: DocumentId, content_type: &str, extent: TextRange) -> ViewId {
		let id = ViewId::next();
		self.state.lock().views.insert(
			id,
			FakeView {
				document,
				content_type: content_type.to_string(),
				extent: Some(extent),
				caret: None,
			},
		);
		id
	}

	pub fn set_caret(&self, view: ViewId, offset: usize) {
		if let Some(v) = self.state.lock().views.get_mut(&view) {
			v.caret = Some(offset);
		}
	}

	pub fn clear_caret(&self, view: ViewId) {
		if let Some(v) = self.state.lock().views.get_mut(&view) {
			v.caret = None;
		}
	}

	/// Inserts `text` at byte `offset`, producing a new snapshot.
	pub fn insert(&self, document: DocumentId, offset: usize, text: &str) -> SnapshotId {
		let mut state = self.state.lock();
		let doc = state.documents.get_mut(&document).expect("unknown document");
		let char_idx = doc.text.byte_to_char(offset);
		doc.text.insert(char_idx, text);
		doc.snapshot = SnapshotId::next();
		doc.snapshot
	}

	/// Closes a document and every view over it.
	pub fn close(&self, document: DocumentId) {
		let mut state = self.state.lock();
		state.documents.remove(&document);
		state.views.retain(|_, v| v.document != document);
	}

	/// Makes every snapshot unknown to the workspace.
	pub fn detach_workspace(&self) {
		self.state.lock().detached = true;
	}

	pub fn snapshot(&self, document: DocumentId) -> Option<SnapshotId> {
		self.state.lock().documents.get(&document).map(|d| d.snapshot)
	}

	/// Position at `offset` in the current snapshot of `document`.
	pub fn position(&self, document: DocumentId, offset: usize) -> TextPosition {
		let snapshot = self.snapshot(document).expect("unknown document");
		TextPosition::new(snapshot, offset)
	}

	pub fn text(&self, document: DocumentId) -> String {
		self.state.lock().documents[&document].text.to_string()
	}

	/// Byte range of the `nth` occurrence of `needle` in `document`.
	pub fn find(&self, document: DocumentId, needle: &str, nth: usize) -> TextRange {
		let text = self.text(document);
		let (start, _) = text.match_indices(needle).nth(nth).expect("needle not found");
		TextRange::new(start, start + needle.len())
	}

	pub fn views_of_document(&self, document: DocumentId) -> Vec<ViewId> {
		self.state.lock().views.iter().filter(|(_, v)| v.document == document).map(|(id, _)| *id).collect()
	}
}

impl EditorHost for FakeEditor {
	fn caret(&self, view: ViewId) -> Option<CaretPoint> {
		let state = self.state.lock();
		let v = state.views.get(&view)?;
		let offset = v.caret?;
		let doc = state.documents.get(&v.document)?;
		Some(CaretPoint {
			position: TextPosition::new(doc.snapshot, offset),
			content_type: v.content_type.clone(),
		})
	}

	fn document_for_snapshot(&self, snapshot: SnapshotId) -> Option<DocumentId> {
		let state = self.state.lock();
		if state.detached {
			return None;
		}
		state.documents.iter().find(|(_, d)| d.snapshot == snapshot).map(|(id, _)| *id)
	}

	fn views_of(&self, document: DocumentId) -> Vec<ProjectedView> {
		let state = self.state.lock();
		let Some(doc) = state.documents.get(&document) else {
			return Vec::new();
		};
		state
			.views
			.iter()
			.filter(|(_, v)| v.document == document)
			.map(|(id, v)| ProjectedView {
				view: *id,
				snapshot: doc.snapshot,
				content_type: v.content_type.clone(),
				extent: v.extent.unwrap_or(TextRange::new(0, doc.text.len_bytes())),
			})
			.collect()
	}

	fn current_snapshot(&self, document: DocumentId) -> Option<SnapshotId> {
		self.snapshot(document)
	}
}

/// Arguments of one resolver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
	pub document: DocumentId,
	pub position: TextPosition,
	pub candidates: BTreeSet<DocumentId>,
}

type Responder = dyn Fn(&ResolverCall) -> Result<Option<Vec<DocumentHighlights>>, ResolveError> + Send + Sync;

/// Resolver that records every call and answers from a closure.
///
/// [`SpyResolver::hold_next`] parks the next call until the returned
/// [`Notify`] fires. A held call ignores cancellation and still returns its
/// answer, modelling a resolver that delivers late.
pub struct SpyResolver {
	responder: Box<Responder>,
	calls: Mutex<Vec<ResolverCall>>,
	gates: Mutex<VecDeque<Arc<Notify>>>,
}

impl SpyResolver {
	pub fn new(responder: impl Fn(&ResolverCall) -> Result<Option<Vec<DocumentHighlights>>, ResolveError> + Send + Sync + 'static) -> Self {
		Self {
			responder: Box::new(responder),
			calls: Mutex::new(Vec::new()),
			gates: Mutex::new(VecDeque::new()),
		}
	}

	/// Always answers with `groups`.
	pub fn fixed(groups: Vec<DocumentHighlights>) -> Self {
		Self::new(move |_| Ok(Some(groups.clone())))
	}

	pub fn failing(err: ResolveError) -> Self {
		Self::new(move |_| Err(err.clone()))
	}

	pub fn hold_next(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		self.gates.lock().push_back(Arc::clone(&gate));
		gate
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().len()
	}

	pub fn calls(&self) -> Vec<ResolverCall> {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl ReferenceResolver for SpyResolver {
	async fn document_highlights(
		&self,
		document: DocumentId,
		position: TextPosition,
		candidates: &BTreeSet<DocumentId>,
		_cancel: CancellationToken,
	) -> Result<Option<Vec<DocumentHighlights>>, ResolveError> {
		let call = ResolverCall {
			document,
			position,
			candidates: candidates.clone(),
		};
		self.calls.lock().push(call.clone());

		let gate = self.gates.lock().pop_front();
		if let Some(gate) = gate {
			gate.notified().await;
		}
		(self.responder)(&call)
	}
}

/// Sink that records every update and mirrors what a renderer would show.
#[derive(Default)]
pub struct RecordingSink {
	updates: Mutex<Vec<(ViewId, TagDiff)>>,
	rendered: Mutex<HashMap<ViewId, TagSet>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn updates(&self) -> Vec<(ViewId, TagDiff)> {
		self.updates.lock().clone()
	}

	pub fn update_count(&self) -> usize {
		self.updates.lock().len()
	}

	pub fn rendered(&self, view: ViewId) -> TagSet {
		self.rendered.lock().get(&view).cloned().unwrap_or_default()
	}
}

impl TagSink for RecordingSink {
	fn apply(&self, view: ViewId, diff: &TagDiff) {
		self.updates.lock().push((view, diff.clone()));
		self.rendered.lock().entry(view).or_default().apply(diff);
	}
}

/// Builds a resolver group from `(range, kind)` pairs.
pub fn highlights(document: DocumentId, spans: &[(TextRange, HighlightSpanKind)]) -> DocumentHighlights {
	DocumentHighlights {
		document,
		spans: spans.iter().map(|&(range, kind)| HighlightSpan::new(range, kind)).collect(),
	}
}
