//! End-to-end scenarios through the debounced controller.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use refmark_highlight::test_helpers::{FakeEditor, RecordingSink, SpyResolver, highlights};
use refmark_highlight::{HighlightConfig, HighlightController, HighlightSpanKind, HighlightTag, NavDirection, TagKind, TriggerKind};
use refmark_primitives::{DocumentId, SnapshotSpan, TextRange, ViewId};

const SOURCE: &str = "foo = 1; p(foo)";
const CARET_DELAY: Duration = Duration::from_millis(250);
const IDLE_DELAY: Duration = Duration::from_millis(1500);

async fn settle() {
	for _ in 0..16 {
		tokio::task::yield_now().await;
	}
}

/// Lets spawned timers register, advances the clock, then lets fired work run.
async fn elapse(duration: Duration) {
	settle().await;
	tokio::time::advance(duration).await;
	settle().await;
}

fn foo_resolver(doc: DocumentId) -> SpyResolver {
	SpyResolver::fixed(vec![highlights(
		doc,
		&[(TextRange::new(0, 3), HighlightSpanKind::Definition), (TextRange::new(11, 14), HighlightSpanKind::Reference)],
	)])
}

struct Harness {
	editor: Arc<FakeEditor>,
	resolver: Arc<SpyResolver>,
	sink: Arc<RecordingSink>,
	controller: HighlightController,
	doc: DocumentId,
	view: ViewId,
}

impl Harness {
	fn new(config: HighlightConfig, make: impl FnOnce(DocumentId) -> SpyResolver) -> Self {
		let _ = tracing_subscriber::fmt::try_init();
		let editor = Arc::new(FakeEditor::new());
		let (doc, view) = editor.open(SOURCE, "code");
		let resolver = Arc::new(make(doc));
		let sink = Arc::new(RecordingSink::new());
		let controller = HighlightController::spawn(view, &config, editor.clone(), resolver.clone(), sink.clone());
		Self {
			editor,
			resolver,
			sink,
			controller,
			doc,
			view,
		}
	}

	fn tag(&self, start: usize, end: usize, kind: TagKind) -> HighlightTag {
		HighlightTag {
			document: self.doc,
			span: SnapshotSpan::new(self.editor.snapshot(self.doc).unwrap(), TextRange::new(start, end)),
			kind,
		}
	}

	async fn move_caret(&self, offset: usize) {
		self.editor.set_caret(self.view, offset);
		self.controller.caret_moved();
		elapse(CARET_DELAY).await;
	}
}

#[tokio::test(start_paused = true)]
async fn caret_navigation_and_edit_scenario() {
	let h = Harness::new(HighlightConfig::default(), foo_resolver);

	h.move_caret(1).await;
	let expected = vec![h.tag(0, 3, TagKind::Definition), h.tag(11, 14, TagKind::Reference)];
	assert_eq!(h.controller.displayed_tags(), expected);
	assert_eq!(h.sink.rendered(h.view).iter().collect::<Vec<_>>(), expected);

	h.move_caret(12).await;
	assert_eq!(h.controller.displayed_tags(), expected);
	assert_eq!(h.resolver.call_count(), 1);
	assert_eq!(h.sink.update_count(), 1);

	h.editor.insert(h.doc, 8, "x");
	h.controller.text_edited();
	assert!(h.controller.displayed_tags().is_empty());
	assert!(h.sink.rendered(h.view).is_empty());

	elapse(IDLE_DELAY).await;
	assert!(h.controller.displayed_tags().is_empty());
	assert_eq!(h.resolver.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn caret_burst_resolves_once() {
	let h = Harness::new(HighlightConfig::default(), foo_resolver);

	for offset in [5, 6, 7, 1] {
		h.editor.set_caret(h.view, offset);
		h.controller.caret_moved();
		elapse(Duration::from_millis(50)).await;
	}
	assert_eq!(h.resolver.call_count(), 0);
	assert!(h.controller.is_pending(TriggerKind::CaretMoved));

	elapse(CARET_DELAY).await;
	assert_eq!(h.resolver.call_count(), 1);
	assert_eq!(h.resolver.calls()[0].position.offset, 1);
}

#[tokio::test(start_paused = true)]
async fn semantic_change_repopulates_after_idle() {
	let h = Harness::new(HighlightConfig::default(), foo_resolver);
	h.move_caret(1).await;

	h.editor.insert(h.doc, SOURCE.len(), ";");
	h.controller.text_edited();
	h.controller.semantic_changed();

	elapse(CARET_DELAY).await;
	assert!(h.controller.displayed_tags().is_empty());

	elapse(IDLE_DELAY).await;
	assert_eq!(h.resolver.call_count(), 2);
	assert_eq!(h.controller.displayed_tags(), vec![h.tag(0, 3, TagKind::Definition), h.tag(11, 14, TagKind::Reference)]);
}

#[tokio::test(start_paused = true)]
async fn navigation_cycles_without_recomputing() {
	let h = Harness::new(HighlightConfig::default(), foo_resolver);
	h.move_caret(1).await;

	let next = h.controller.navigate(NavDirection::Next).unwrap();
	assert_eq!(next, h.editor.position(h.doc, 11));

	h.move_caret(next.offset).await;
	assert_eq!(h.resolver.call_count(), 1);

	assert_eq!(h.controller.navigate(NavDirection::Next).unwrap().offset, 0);
	assert_eq!(h.controller.navigate(NavDirection::Previous).unwrap().offset, 0);

	h.editor.set_caret(h.view, 5);
	assert_eq!(h.controller.navigate(NavDirection::Next), None);
}

#[tokio::test(start_paused = true)]
async fn late_result_is_discarded() {
	let h = Harness::new(HighlightConfig::default(), |doc| {
		SpyResolver::new(move |call| {
			let spans = if call.position.offset < 5 {
				[(TextRange::new(0, 3), HighlightSpanKind::Definition)]
			} else {
				[(TextRange::new(11, 14), HighlightSpanKind::Reference)]
			};
			Ok(Some(vec![highlights(doc, &spans)]))
		})
	});
	let gate = h.resolver.hold_next();

	h.move_caret(1).await;
	assert_eq!(h.resolver.call_count(), 1);
	assert!(h.controller.displayed_tags().is_empty());

	h.move_caret(12).await;
	assert_eq!(h.resolver.call_count(), 2);

	gate.notify_one();
	settle().await;
	assert_eq!(h.controller.displayed_tags(), vec![h.tag(11, 14, TagKind::Reference)]);
	assert_eq!(h.sink.update_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn split_views_run_independent_contexts() {
	let _ = tracing_subscriber::fmt::try_init();
	let editor = Arc::new(FakeEditor::new());
	let (doc, left) = editor.open(SOURCE, "code");
	let right = editor.split(left);
	let resolver = Arc::new(foo_resolver(doc));
	let sink = Arc::new(RecordingSink::new());
	let config = HighlightConfig::default();
	let left_ctl = HighlightController::spawn(left, &config, editor.clone(), resolver.clone(), sink.clone());
	let right_ctl = HighlightController::spawn(right, &config, editor.clone(), resolver.clone(), sink.clone());

	editor.set_caret(left, 12);
	left_ctl.caret_moved();
	elapse(CARET_DELAY).await;

	assert_eq!(left_ctl.displayed_tags().len(), 2);
	assert!(right_ctl.displayed_tags().is_empty());
	assert_eq!(sink.rendered(left).len(), 2);
	assert!(sink.rendered(right).is_empty());
	assert_eq!(resolver.calls()[0].candidates.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabled_controller_never_resolves() {
	let config = HighlightConfig {
		enabled: false,
		..HighlightConfig::default()
	};
	let h = Harness::new(config, foo_resolver);

	h.move_caret(1).await;
	elapse(IDLE_DELAY).await;
	assert_eq!(h.resolver.call_count(), 0);
	assert!(h.controller.displayed_tags().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_triggers() {
	let mut h = Harness::new(HighlightConfig::default(), foo_resolver);
	h.editor.set_caret(h.view, 1);
	h.controller.caret_moved();
	settle().await;

	h.controller.shutdown();
	assert!(!h.controller.is_pending(TriggerKind::CaretMoved));
	elapse(CARET_DELAY).await;
	assert_eq!(h.resolver.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_clears_rendered_tags() {
	let h = Harness::new(HighlightConfig::default(), foo_resolver);
	h.move_caret(1).await;
	assert_eq!(h.sink.rendered(h.view).len(), 2);

	let Harness { sink, controller, view, .. } = h;
	drop(controller);
	assert!(sink.rendered(view).is_empty());
}
