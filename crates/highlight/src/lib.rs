//! Reference highlighting for the symbol under the caret.
//!
//! One [`HighlightController`] drives one view. It merges two debounced
//! trigger streams (caret movement and semantic changes) into recompute
//! requests, resolves the caret and the spans eligible for tagging, asks a
//! [`ReferenceResolver`] for related occurrences, and reconciles the result
//! against the tags already on screen before handing an atomic add/remove
//! diff to a [`TagSink`].
//!
//! ```text
//! TriggerSource ─▶ ScopeResolver ─▶ HighlightEngine ─▶ ReferenceResolver
//!                                        │
//!                                        ▼
//!                              reconcile ─▶ TagSet ─▶ TagSink
//! ```
//!
//! Any text edit clears every displayed tag; a fresh caret trigger is
//! required to repopulate them.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod host;
pub mod navigation;
pub mod reconcile;
pub mod resolver;
pub mod scope;
pub mod tags;
pub mod trigger;

#[doc(hidden)]
pub mod test_helpers;

pub use config::HighlightConfig;
pub use controller::HighlightController;
pub use engine::{HighlightEngine, Outcome, Phase};
pub use error::{ConfigError, ResolveError, ScopeError};
pub use host::{CaretPoint, EditorHost, ProjectedView, TagSink};
pub use navigation::NavDirection;
pub use reconcile::{Decision, TagDiff};
pub use resolver::{DocumentHighlights, HighlightSpan, HighlightSpanKind, ReferenceResolver};
pub use scope::{CandidateSpan, HighlightRequest, ScopeResolver};
pub use tags::{HighlightTag, TagKind, TagSet};
pub use trigger::{TriggerKind, TriggerSource};
