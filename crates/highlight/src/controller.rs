//! Per-view wiring of triggers, engine, and driver task.

use std::sync::Arc;

use refmark_primitives::{TextPosition, ViewId};
use refmark_worker::{TaskClass, spawn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::HighlightConfig;
use crate::engine::{HighlightEngine, Start};
use crate::host::{EditorHost, TagSink};
use crate::navigation::{NavDirection, navigate};
use crate::resolver::ReferenceResolver;
use crate::tags::HighlightTag;
use crate::trigger::{TriggerKind, TriggerSource};

/// Highlighting for one view.
///
/// Dropping the controller shuts it down: pending debounce timers and any
/// in-flight computation are cancelled and displayed tags are cleared.
pub struct HighlightController {
	view: ViewId,
	host: Arc<dyn EditorHost>,
	engine: Arc<HighlightEngine>,
	triggers: TriggerSource,
	shutdown: CancellationToken,
	driver: Option<JoinHandle<()>>,
}

impl HighlightController {
	/// Creates the context for `view` and starts its driver task.
	pub fn spawn(
		view: ViewId,
		config: &HighlightConfig,
		host: Arc<dyn EditorHost>,
		resolver: Arc<dyn ReferenceResolver>,
		sink: Arc<dyn TagSink>,
	) -> Self {
		let engine = Arc::new(HighlightEngine::new(view, config, Arc::clone(&host), resolver, sink));
		let (triggers, rx) = TriggerSource::new(config);
		let shutdown = CancellationToken::new();
		let driver = spawn(TaskClass::Interactive, "highlight.driver", drive(Arc::clone(&engine), rx, shutdown.clone()));
		debug!(view = %view, enabled = config.enabled, "highlight.controller.spawned");

		Self {
			view,
			host,
			engine,
			triggers,
			shutdown,
			driver: Some(driver),
		}
	}

	pub fn view(&self) -> ViewId {
		self.view
	}

	pub fn engine(&self) -> &Arc<HighlightEngine> {
		&self.engine
	}

	pub fn caret_moved(&self) {
		self.triggers.caret_moved();
	}

	pub fn semantic_changed(&self) {
		self.triggers.semantic_changed();
	}

	/// Reports a text edit. Every displayed tag is cleared immediately.
	pub fn text_edited(&self) {
		self.engine.clear_for_edit();
	}

	pub fn is_pending(&self, kind: TriggerKind) -> bool {
		self.triggers.is_pending(kind)
	}

	pub fn displayed_tags(&self) -> Vec<HighlightTag> {
		self.engine.displayed_tags()
	}

	/// Position of the next or previous highlight relative to the caret.
	///
	/// The host moves the caret there; the resulting caret trigger lands
	/// inside a displayed tag and keeps the current highlights.
	pub fn navigate(&self, direction: NavDirection) -> Option<TextPosition> {
		let caret = self.host.caret(self.view)?;
		let target = self.engine.with_tags(|tags| navigate(tags, caret.position, direction))?;
		trace!(view = %self.view, ?direction, offset = target.span.range.start, "highlight.controller.navigate");
		Some(target.span.start())
	}

	/// Stops the driver, cancels pending and in-flight work, and clears tags.
	pub fn shutdown(&mut self) {
		self.triggers.cancel_pending();
		self.shutdown.cancel();
		self.engine.shutdown();
		if let Some(driver) = self.driver.take() {
			driver.abort();
		}
	}
}

impl Drop for HighlightController {
	fn drop(&mut self) {
		self.shutdown();
	}
}

/// Runs each fired trigger's synchronous step in arrival order and offloads
/// only the resolver wait, so a newer trigger can supersede it.
async fn drive(engine: Arc<HighlightEngine>, mut rx: mpsc::UnboundedReceiver<TriggerKind>, shutdown: CancellationToken) {
	loop {
		let kind = tokio::select! {
			biased;
			_ = shutdown.cancelled() => break,
			kind = rx.recv() => match kind {
				Some(kind) => kind,
				None => break,
			},
		};

		trace!(view = %engine.view(), trigger = kind.as_str(), "highlight.controller.trigger");
		match engine.start() {
			Start::Done(outcome) => {
				trace!(view = %engine.view(), ?outcome, "highlight.controller.done");
			}
			Start::Compute(computation) => {
				let engine = Arc::clone(&engine);
				spawn(TaskClass::Interactive, "highlight.resolve", async move {
					let outcome = engine.finish(computation).await;
					trace!(view = %engine.view(), ?outcome, "highlight.controller.done");
				});
			}
		}
	}
	debug!(view = %engine.view(), "highlight.controller.stopped");
}
