//! Merges debounced caret and semantic-change signals into one recompute stream.

use refmark_worker::{Debouncer, TaskClass};
use tokio::sync::mpsc;

use crate::config::HighlightConfig;

/// Which signal produced a recompute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
	CaretMoved,
	SemanticChanged,
}

impl TriggerKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::CaretMoved => "caret_moved",
			Self::SemanticChanged => "semantic_changed",
		}
	}
}

/// Two independently debounced signals feeding a single receiver.
///
/// Raw text edits are not a trigger. The host reports them to the engine,
/// which clears every tag instead of recomputing.
#[derive(Debug)]
pub struct TriggerSource {
	caret: Debouncer,
	semantic: Debouncer,
	tx: mpsc::UnboundedSender<TriggerKind>,
}

impl TriggerSource {
	pub fn new(config: &HighlightConfig) -> (Self, mpsc::UnboundedReceiver<TriggerKind>) {
		let (tx, rx) = mpsc::unbounded_channel();
		let source = Self {
			caret: Debouncer::new("highlight.caret", config.caret_delay(), TaskClass::Interactive),
			semantic: Debouncer::new("highlight.semantic", config.semantic_delay(), TaskClass::Background),
			tx,
		};
		(source, rx)
	}

	/// Reports caret movement, restarting the caret debounce.
	pub fn caret_moved(&self) {
		self.schedule(TriggerKind::CaretMoved);
	}

	/// Reports a semantic change, restarting the on-idle debounce.
	pub fn semantic_changed(&self) {
		self.schedule(TriggerKind::SemanticChanged);
	}

	fn schedule(&self, kind: TriggerKind) {
		let tx = self.tx.clone();
		self.debouncer(kind).schedule(move || {
			if tx.send(kind).is_err() {
				tracing::trace!(trigger = kind.as_str(), "highlight.trigger.receiver_closed");
			}
		});
	}

	/// Cancels the pending timer for `kind`. Returns true if one was pending.
	pub fn cancel(&self, kind: TriggerKind) -> bool {
		self.debouncer(kind).cancel()
	}

	/// Cancels both pending timers. Returns true if either was pending.
	pub fn cancel_pending(&self) -> bool {
		let caret = self.caret.cancel();
		let semantic = self.semantic.cancel();
		caret || semantic
	}

	pub fn is_pending(&self, kind: TriggerKind) -> bool {
		self.debouncer(kind).is_pending()
	}

	fn debouncer(&self, kind: TriggerKind) -> &Debouncer {
		match kind {
			TriggerKind::CaretMoved => &self.caret,
			TriggerKind::SemanticChanged => &self.semantic,
		}
	}
}
