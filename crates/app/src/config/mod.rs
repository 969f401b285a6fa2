//! Registry configuration loaded from TOML.
//!
//! ```toml
//! platform = "macos"
//! raise_synchronous_exceptions = true
//! palette_menu_id = "palette"
//! reject_modifier_only_keybindings = true
//! ```
//!
//! Every field is optional.

use std::path::Path;

use actuate_keys::OperatingSystem;
use actuate_model::menus::COMMAND_PALETTE;
use serde::{Deserialize, Serialize};

use crate::ConfigError;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
	/// Platform used to resolve keybindings; the build target when unset.
	pub platform: Option<OperatingSystem>,
	/// Synchronous command failures are returned from `execute` directly.
	pub raise_synchronous_exceptions: bool,
	pub palette_menu_id: String,
	/// Refuse keybindings that press only modifier keys.
	pub reject_modifier_only_keybindings: bool,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			platform: None,
			raise_synchronous_exceptions: false,
			palette_menu_id: COMMAND_PALETTE.to_owned(),
			reject_modifier_only_keybindings: false,
		}
	}
}

impl ModelConfig {
	/// # Errors
	///
	/// [`ConfigError::Toml`] for malformed input or unknown fields.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// # Errors
	///
	/// [`ConfigError::Io`] if the file cannot be read, otherwise as
	/// [`ModelConfig::from_toml_str`].
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "loaded model config");
		Ok(config)
	}

	/// The configured platform, else the build target's.
	pub fn platform(&self) -> OperatingSystem {
		self.platform.unwrap_or_else(OperatingSystem::current)
	}
}
