//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::error::BehaviorError;

/// Default prefix for every behavior attribute.
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-t-";

/// Configuration for a [`Runtime`](crate::Runtime).
///
/// ```ignore
/// let config = RuntimeConfig::from_json(r#"{ "attribute_prefix": "data-ui-" }"#)?;
/// assert_eq!(config.event_attribute("click"), "data-ui-on-click");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
	/// Prefix of every behavior attribute, e.g. `data-t-` for `data-t-on-click`.
	#[serde(default = "default_attribute_prefix")]
	pub attribute_prefix: String,

	/// Log a warning when `create` overwrites an already registered id
	#[serde(default = "default_warn_on_duplicate_ids")]
	pub warn_on_duplicate_ids: bool,
}

fn default_attribute_prefix() -> String {
	DEFAULT_ATTRIBUTE_PREFIX.to_string()
}

fn default_warn_on_duplicate_ids() -> bool {
	cfg!(debug_assertions)
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			attribute_prefix: default_attribute_prefix(),
			warn_on_duplicate_ids: default_warn_on_duplicate_ids(),
		}
	}
}

impl RuntimeConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the attribute prefix.
	pub fn with_attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.attribute_prefix = prefix.into();
		self
	}

	/// Sets whether duplicate id registrations are logged.
	pub fn with_duplicate_id_warnings(mut self, warn: bool) -> Self {
		self.warn_on_duplicate_ids = warn;
		self
	}

	/// Parses and validates a JSON configuration. Missing fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self, BehaviorError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that the prefix yields valid, lowercase `data-*` attribute names.
	pub fn validate(&self) -> Result<(), BehaviorError> {
		let prefix = &self.attribute_prefix;
		if !prefix.starts_with("data-") {
			return Err(BehaviorError::Config(format!(
				"attribute prefix '{}' must start with 'data-'",
				prefix
			)));
		}
		let valid = prefix.chars().all(|c| {
			c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
		});
		if !valid {
			return Err(BehaviorError::Config(format!(
				"attribute prefix '{}' may only contain lowercase ASCII letters, digits, '-', '_' and '.'",
				prefix
			)));
		}
		Ok(())
	}

	/// Returns the attribute holding handler ids for `event_type`.
	pub fn event_attribute(&self, event_type: &str) -> String {
		format!("{}on-{}", self.attribute_prefix, event_type)
	}

	/// Returns the mount attribute.
	pub fn mount_attribute(&self) -> String {
		format!("{}mount", self.attribute_prefix)
	}

	/// Returns the before-show attribute.
	pub fn before_show_attribute(&self) -> String {
		format!("{}before-show", self.attribute_prefix)
	}

	/// Returns the after-hide attribute.
	pub fn after_hide_attribute(&self) -> String {
		format!("{}after-hide", self.attribute_prefix)
	}
}
