use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Issues strictly increasing generations for one stream of work.
///
/// Clones share the counter.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	latest: Arc<AtomicU64>,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Advances the clock and returns the new generation. The first is 1.
	pub fn next(&self) -> u64 {
		self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Latest generation handed out, or 0 before the first.
	pub fn current(&self) -> u64 {
		self.latest.load(Ordering::Acquire)
	}
}

/// Cancellation handle for one generation of work.
///
/// Cloning shares the cancellation state.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Takes the next generation from `clock` with a fresh cancellation root.
	pub fn issue(clock: &GenerationClock) -> Self {
		Self {
			generation: clock.next(),
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// True while this token is uncancelled and still the newest one `clock` issued.
	pub fn is_current(&self, clock: &GenerationClock) -> bool {
		!self.is_cancelled() && clock.current() == self.generation
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Resolves once [`GenerationToken::cancel`] has been called on any clone.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Child of the underlying token for collaborators that only understand
	/// [`CancellationToken`]. Cancelling it does not cancel this generation.
	pub fn cancellation(&self) -> CancellationToken {
		self.cancel.child_token()
	}
}
