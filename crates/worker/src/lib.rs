//! Worker primitives for the highlight pipeline.
//!
//! * [`spawn`] routes tasks onto the ambient Tokio runtime, or a small shared
//!   fallback runtime when called from outside one.
//! * [`GenerationClock`] and [`GenerationToken`] tag each unit of work with a
//!   monotonically increasing generation and a cooperative cancellation token.
//! * [`Debouncer`] schedules a callback after a quiet period, superseding any
//!   previously scheduled callback.

mod class;
mod debounce;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::Debouncer;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
