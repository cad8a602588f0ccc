//! Highlight settings.
//!
//! ```toml
//! enabled = true
//! caret_delay_ms = 250
//! semantic_delay_ms = 1500
//! content_types = ["code"]
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Content type pattern that matches every buffer kind.
pub const ANY_CONTENT_TYPE: &str = "*";

/// Settings for one highlight controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
	/// When false, triggers are ignored and no tags are ever displayed.
	pub enabled: bool,
	/// Quiet period after the last caret movement before recomputing.
	pub caret_delay_ms: u64,
	/// Quiet period after the last semantic change before recomputing.
	pub semantic_delay_ms: u64,
	/// Buffer content types that participate in highlighting.
	pub content_types: Vec<String>,
}

impl Default for HighlightConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			caret_delay_ms: 250,
			semantic_delay_ms: 1500,
			content_types: vec!["code".to_string()],
		}
	}
}

impl HighlightConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks the config for values the pipeline cannot run with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.content_types.is_empty() {
			return Err(ConfigError::Invalid("content_types must name at least one content type".into()));
		}
		if let Some(blank) = self.content_types.iter().find(|ct| ct.trim().is_empty()) {
			return Err(ConfigError::Invalid(format!("content type {blank:?} is blank")));
		}
		if self.caret_delay_ms > self.semantic_delay_ms {
			warn!(
				caret_delay_ms = self.caret_delay_ms,
				semantic_delay_ms = self.semantic_delay_ms,
				"highlight.config.caret_slower_than_semantic"
			);
		}
		Ok(())
	}

	pub fn caret_delay(&self) -> Duration {
		Duration::from_millis(self.caret_delay_ms)
	}

	pub fn semantic_delay(&self) -> Duration {
		Duration::from_millis(self.semantic_delay_ms)
	}

	/// Returns true if buffers of `content_type` take part in highlighting.
	pub fn accepts_content_type(&self, content_type: &str) -> bool {
		self.content_types.iter().any(|ct| ct == ANY_CONTENT_TYPE || ct == content_type)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[test]
	fn empty_source_yields_defaults() {
		assert_eq!(HighlightConfig::from_toml_str("").unwrap(), HighlightConfig::default());
	}

	#[test]
	fn partial_source_keeps_other_defaults() {
		let config = HighlightConfig::from_toml_str("caret_delay_ms = 40\ncontent_types = [\"rust\", \"toml\"]").unwrap();
		assert_eq!(config.caret_delay(), Duration::from_millis(40));
		assert_eq!(config.semantic_delay(), Duration::from_millis(1500));
		assert_eq!(config.content_types, vec!["rust".to_string(), "toml".to_string()]);
		assert!(config.enabled);
	}

	#[test]
	fn unknown_key_is_a_parse_error() {
		let err = HighlightConfig::from_toml_str("caret_delay = 40").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn empty_content_types_rejected() {
		let err = HighlightConfig::from_toml_str("content_types = []").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid(_)));
	}

	#[test]
	fn blank_content_type_rejected() {
		let err = HighlightConfig::from_toml_str("content_types = [\"code\", \" \"]").unwrap_err();
		assert!(matches!(err, ConfigError::Invalid(_)));
	}

	#[rstest]
	#[case(&["code"], "code", true)]
	#[case(&["code"], "markdown", false)]
	#[case(&["rust", "code"], "code", true)]
	#[case(&["*"], "anything", true)]
	fn content_type_filter(#[case] types: &[&str], #[case] probe: &str, #[case] expected: bool) {
		let config = HighlightConfig {
			content_types: types.iter().map(|s| s.to_string()).collect(),
			..HighlightConfig::default()
		};
		assert_eq!(config.accepts_content_type(probe), expected);
	}
}
