use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::TaskClass;

/// Runtime used when a caller has no ambient Tokio context, such as a
/// synchronous editor callback.
fn fallback_runtime() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		Builder::new_multi_thread()
			.enable_time()
			.worker_threads(1)
			.thread_name("refmark-worker")
			.build()
			.expect("refmark-worker fallback runtime")
	})
}

/// Spawns `fut` under a `task` span carrying its class and `name`.
///
/// Uses the caller's runtime when there is one so that paused test clocks
/// and runtime shutdown apply to the task.
pub fn spawn<F>(class: TaskClass, name: &'static str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	let span = tracing::trace_span!("task", class = %class, name);
	let fut = fut.instrument(span);
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => {
			tracing::debug!(class = %class, name, "worker.spawn.fallback");
			fallback_runtime().spawn(fut)
		}
	}
}
