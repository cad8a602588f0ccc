use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::token::{GenerationClock, GenerationToken};
use crate::{TaskClass, spawn};

/// Trailing-edge debounce timer.
///
/// Each [`Debouncer::schedule`] call supersedes the previously scheduled
/// callback: the older timer is cancelled and only the newest callback fires,
/// once `delay` has elapsed without another schedule.
#[derive(Debug)]
pub struct Debouncer {
	name: &'static str,
	delay: Duration,
	class: TaskClass,
	clock: GenerationClock,
	pending: Arc<Mutex<Option<GenerationToken>>>,
}

impl Debouncer {
	pub fn new(name: &'static str, delay: Duration, class: TaskClass) -> Self {
		Self {
			name,
			delay,
			class,
			clock: GenerationClock::new(),
			pending: Arc::new(Mutex::new(None)),
		}
	}

	/// Schedules `fire` to run after the quiet period, cancelling any pending timer.
	pub fn schedule<F>(&self, fire: F)
	where
		F: FnOnce() + Send + 'static,
	{
		let token = GenerationToken::issue(&self.clock);
		if let Some(previous) = self.pending.lock().replace(token.clone()) {
			previous.cancel();
		}

		let name = self.name;
		let delay = self.delay;
		let pending = Arc::clone(&self.pending);
		spawn(self.class, self.name, async move {
			tokio::select! {
				biased;
				_ = token.cancelled() => {
					tracing::trace!(debounce = name, generation = token.generation(), "worker.debounce.cancelled");
				}
				_ = tokio::time::sleep(delay) => {
					{
						let mut slot = pending.lock();
						if slot.as_ref().map(GenerationToken::generation) != Some(token.generation()) {
							return;
						}
						*slot = None;
					}
					tracing::trace!(debounce = name, generation = token.generation(), "worker.debounce.fired");
					fire();
				}
			}
		});
	}

	/// Cancels the pending timer, if any. Returns true if one was pending.
	pub fn cancel(&self) -> bool {
		match self.pending.lock().take() {
			Some(token) => {
				token.cancel();
				true
			}
			None => false,
		}
	}

	/// Returns true while a scheduled callback has not yet fired or been cancelled.
	pub fn is_pending(&self) -> bool {
		self.pending.lock().is_some()
	}
}

impl Drop for Debouncer {
	fn drop(&mut self) {
		self.cancel();
	}
}
