//! Error types for configuration, scope resolution, and reference resolution.
//!
//! None of these are fatal. Scope and resolver errors degrade to "no
//! highlights shown"; config errors surface only when loading settings.

use refmark_primitives::{SnapshotId, ViewId};

/// Errors from loading or validating [`crate::HighlightConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The TOML source did not parse or did not match the schema.
	#[error("failed to parse highlight config: {0}")]
	Parse(#[from] toml::de::Error),
	/// The config parsed but holds unusable values.
	#[error("invalid highlight config: {0}")]
	Invalid(String),
}

/// Errors reported by a [`crate::ReferenceResolver`].
///
/// The engine treats every variant like an empty result and clears tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// No resolver is available for the document (service not running, language unsupported).
	#[error("reference resolver unavailable")]
	Unavailable,
	/// The resolver ran and failed.
	#[error("reference resolution failed: {0}")]
	Failed(String),
}

/// Reasons the caret cannot be resolved into a highlight request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
	#[error("{0} has no caret")]
	NoCaret(ViewId),
	#[error("content type `{0}` does not take part in highlighting")]
	UnsupportedContent(String),
	#[error("no document is associated with {0}")]
	NoDocument(SnapshotId),
}
