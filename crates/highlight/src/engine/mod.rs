//! Highlight computation engine.
//!
//! One engine owns the displayed tags of one view. Each trigger runs
//! [`HighlightEngine::start`] synchronously: resolve the caret, take the
//! fast path when the caret already sits inside a displayed tag, otherwise
//! supersede any in-flight computation and issue a new one. Only the
//! resolver call in [`HighlightEngine::finish`] suspends.
//!
//! Ordering: every issued computation takes a generation from the engine's
//! clock. A result is applied only while its generation is still the latest
//! one issued, so a superseded computation never overwrites a newer one,
//! even when its resolver ignores cancellation and answers late.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use refmark_primitives::{SnapshotSpan, ViewId};
use refmark_worker::{GenerationClock, GenerationToken};
use tracing::{debug, trace};

use crate::config::HighlightConfig;
use crate::error::{ResolveError, ScopeError};
use crate::host::{EditorHost, TagSink};
use crate::reconcile::{Decision, reconcile};
use crate::resolver::{DocumentHighlights, ReferenceResolver};
use crate::scope::{HighlightRequest, ScopeResolver};
use crate::tags::{HighlightTag, TagSet};


/// Observable state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No computation in flight.
	Idle,
	/// A resolver call for generation `seq` is in flight.
	Computing { seq: u64 },
}

/// The path one trigger took through the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The engine is disabled or shut down; nothing happened.
	Disabled,
	/// The caret could not be resolved; tags were cleared without calling the resolver.
	NoScope(ScopeError),
	/// The caret sits inside a displayed tag; tags were kept as they are.
	Preserved,
	/// A computed tag set replaced the displayed one.
	Applied { added: usize, removed: usize },
	/// The resolver found nothing or failed; all tags were removed.
	Cleared { removed: usize },
	/// A newer trigger, an edit, or shutdown superseded this computation; its result was discarded.
	Superseded,
}

/// A computation issued by [`HighlightEngine::start`] and awaiting its resolver call.
#[derive(Debug)]
pub struct Computation {
	request: HighlightRequest,
	token: GenerationToken,
}

impl Computation {
	pub fn seq(&self) -> u64 {
		self.token.generation()
	}
}

/// Result of the synchronous part of a trigger.
#[derive(Debug)]
pub enum Start {
	/// The trigger completed without suspending.
	Done(Outcome),
	/// The resolver must be awaited through [`HighlightEngine::finish`].
	Compute(Computation),
}

struct EngineState {
	phase: Phase,
	tags: TagSet,
	in_flight: Option<GenerationToken>,
}

pub struct HighlightEngine {
	view: ViewId,
	host: Arc<dyn EditorHost>,
	resolver: Arc<dyn ReferenceResolver>,
	sink: Arc<dyn TagSink>,
	scope: ScopeResolver,
	clock: GenerationClock,
	enabled: AtomicBool,
	state: Mutex<EngineState>,
}

impl HighlightEngine {
	pub fn new(
		view: ViewId,
		config: &HighlightConfig,
		host: Arc<dyn EditorHost>,
		resolver: Arc<dyn ReferenceResolver>,
		sink: Arc<dyn TagSink>,
	) -> Self {
		Self {
			view,
			host,
			resolver,
			sink,
			scope: ScopeResolver::new(config),
			clock: GenerationClock::new(),
			enabled: AtomicBool::new(config.enabled),
			state: Mutex::new(EngineState {
				phase: Phase::Idle,
				tags: TagSet::new(),
				in_flight: None,
			}),
		}
	}

	pub fn view(&self) -> ViewId {
		self.view
	}

	pub fn phase(&self) -> Phase {
		self.state.lock().phase
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Snapshot of the displayed tags in document order.
	pub fn displayed_tags(&self) -> Vec<HighlightTag> {
		self.state.lock().tags.iter().collect()
	}

	/// Runs `f` against the displayed tags without copying them.
	pub fn with_tags<R>(&self, f: impl FnOnce(&TagSet) -> R) -> R {
		f(&self.state.lock().tags)
	}

	/// Handles one trigger end to end.
	pub async fn recompute(&self) -> Outcome {
		match self.start() {
			Start::Done(outcome) => outcome,
			Start::Compute(computation) => self.finish(computation).await,
		}
	}

	/// Synchronous part of a trigger: scope resolution, the reuse check, and
	/// superseding any in-flight computation.
	pub fn start(&self) -> Start {
		if !self.is_enabled() {
			return Start::Done(Outcome::Disabled);
		}

		let request = match self.scope.resolve(&*self.host, self.view) {
			Ok(request) => request,
			Err(err) => {
				debug!(view = %self.view, error = %err, "highlight.engine.no_scope");
				let mut state = self.state.lock();
				self.supersede(&mut state);
				self.commit(&mut state, Decision::Clear);
				return Start::Done(Outcome::NoScope(err));
			}
		};

		let mut state = self.state.lock();
		if state.tags.containing(request.caret).is_some() {
			self.supersede(&mut state);
			trace!(view = %self.view, offset = request.caret.offset, "highlight.engine.preserved");
			return Start::Done(self.commit(&mut state, Decision::Preserve));
		}

		self.supersede(&mut state);
		let token = GenerationToken::issue(&self.clock);
		let seq = token.generation();
		state.in_flight = Some(token.clone());
		state.phase = Phase::Computing { seq };
		debug!(
			view = %self.view,
			seq,
			document = %request.document,
			offset = request.caret.offset,
			candidates = request.candidate_documents.len(),
			"highlight.engine.compute"
		);
		Start::Compute(Computation { request, token })
	}

	/// Awaits the resolver for `computation` and applies its result if it is
	/// still the latest one issued.
	pub async fn finish(&self, computation: Computation) -> Outcome {
		let Computation { request, token } = computation;
		let seq = token.generation();

		let result = tokio::select! {
			biased;
			_ = token.cancelled() => {
				trace!(view = %self.view, seq, "highlight.engine.cancelled");
				return Outcome::Superseded;
			}
			result = self.resolver.document_highlights(request.document, request.caret, &request.candidate_documents, token.cancellation()) => result,
		};

		let mut state = self.state.lock();
		if !token.is_current(&self.clock) {
			trace!(view = %self.view, seq, latest = self.clock.current(), "highlight.engine.superseded");
			return Outcome::Superseded;
		}
		state.in_flight = None;
		state.phase = Phase::Idle;

		let decision = self.decide(seq, &request, result);
		self.commit(&mut state, decision)
	}

	/// Clears every tag after a text edit and drops any in-flight computation.
	///
	/// Spans are not re-anchored through the edit: whether an edit changed
	/// symbol identity is not locally knowable, so all highlight state is
	/// invalidated until the next caret trigger.
	pub fn clear_for_edit(&self) -> usize {
		let mut state = self.state.lock();
		self.supersede(&mut state);
		let removed = state.tags.len();
		self.commit(&mut state, Decision::Clear);
		debug!(view = %self.view, removed, "highlight.engine.edit_cleared");
		removed
	}

	/// Disables the engine, cancels in-flight work, and clears the displayed tags.
	pub fn shutdown(&self) {
		self.enabled.store(false, Ordering::Release);
		let mut state = self.state.lock();
		self.supersede(&mut state);
		self.commit(&mut state, Decision::Clear);
		debug!(view = %self.view, "highlight.engine.shutdown");
	}

	/// Cancels the in-flight computation and advances the clock so that any
	/// answer it still produces is recognised as stale.
	fn supersede(&self, state: &mut EngineState) {
		if let Some(token) = state.in_flight.take() {
			token.cancel();
			trace!(view = %self.view, seq = token.generation(), "highlight.engine.cancel_in_flight");
		}
		if matches!(state.phase, Phase::Computing { .. }) {
			self.clock.next();
		}
		state.phase = Phase::Idle;
	}

	fn decide(
		&self,
		seq: u64,
		request: &HighlightRequest,
		result: Result<Option<Vec<DocumentHighlights>>, ResolveError>,
	) -> Decision {
		match result {
			Ok(Some(groups)) if !groups.is_empty() => Decision::Replace(self.project(request, groups)),
			Ok(_) => {
				trace!(view = %self.view, seq, "highlight.engine.empty_result");
				Decision::Clear
			}
			Err(err) => {
				debug!(view = %self.view, seq, error = %err, "highlight.engine.resolver_failed");
				Decision::Clear
			}
		}
	}

	/// Converts resolver groups into tags on the request's eligible spans.
	///
	/// A group is dropped when its document has no eligible span, or when
	/// the snapshot of that span is no longer the document's live one. A
	/// resolver span is kept only if an eligible span covers it. The
	/// remaining groups are still applied.
	fn project(&self, request: &HighlightRequest, groups: Vec<DocumentHighlights>) -> TagSet {
		let mut tags = TagSet::new();
		for group in groups {
			let live = self.host.current_snapshot(group.document);
			let eligible: Vec<SnapshotSpan> = request.spans_of(group.document).copied().collect();
			if eligible.is_empty() {
				debug!(view = %self.view, document = %group.document, "highlight.engine.group_not_candidate");
				continue;
			}
			let eligible: Vec<SnapshotSpan> = eligible.into_iter().filter(|c| Some(c.snapshot) == live).collect();
			if eligible.is_empty() {
				debug!(view = %self.view, document = %group.document, "highlight.engine.group_dropped");
				continue;
			}

			for span in group.spans {
				let Some(target) = eligible.iter().find(|c| c.range.covers(&span.range)) else {
					trace!(view = %self.view, document = %group.document, start = span.range.start, end = span.range.end, "highlight.engine.span_outside_scope");
					continue;
				};
				tags.insert(HighlightTag {
					document: group.document,
					span: SnapshotSpan::new(target.snapshot, span.range),
					kind: span.kind.into(),
				});
			}
		}
		tags
	}

	/// Reconciles the decision against the displayed tags and emits the diff.
	fn commit(&self, state: &mut EngineState, decision: Decision) -> Outcome {
		let diff = reconcile(&state.tags, &decision);
		state.tags.apply(&diff);
		let (added, removed) = (diff.added.len(), diff.removed.len());
		if !diff.is_empty() {
			self.sink.apply(self.view, &diff);
			debug!(view = %self.view, added, removed, "highlight.engine.applied");
		}

		match decision {
			Decision::Preserve => Outcome::Preserved,
			Decision::Clear => Outcome::Cleared { removed },
			Decision::Replace(_) => Outcome::Applied { added, removed },
		}
	}
}

impl std::fmt::Debug for HighlightEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HighlightEngine")
			.field("view", &self.view)
			.field("phase", &self.phase())
			.field("enabled", &self.is_enabled())
			.finish_non_exhaustive()
	}
}
