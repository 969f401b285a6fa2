use serde::{Deserialize, Serialize};

/// Operating system family used to resolve platform-relative modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
	Windows,
	#[serde(alias = "mac", alias = "darwin")]
	MacOS,
	Linux,
}

impl OperatingSystem {
	/// The platform this binary was compiled for.
	pub const fn current() -> Self {
		if cfg!(target_os = "macos") {
			Self::MacOS
		} else if cfg!(target_os = "windows") {
			Self::Windows
		} else {
			Self::Linux
		}
	}

	pub const fn is_mac(self) -> bool {
		matches!(self, Self::MacOS)
	}

	/// Display name of the meta key on this platform.
	pub const fn meta_name(self) -> &'static str {
		match self {
			Self::MacOS => "Cmd",
			Self::Windows => "Win",
			Self::Linux => "Super",
		}
	}
}
