use std::fmt;

/// How urgently spawned work should run; recorded on each task's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Follows the caret; the user is waiting on it.
	Interactive,
	/// Deferred until the editor is idle; may be superseded before it runs.
	Background,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}

impl fmt::Display for TaskClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
