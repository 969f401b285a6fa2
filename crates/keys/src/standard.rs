//! Well-known shortcuts whose keys differ between platforms.

use crate::{KeyBinding, KeyCode, KeyCombo, KeyMod, OperatingSystem};

/// Common application shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardKeyBinding {
	Close,
	Copy,
	Cut,
	Find,
	FullScreen,
	New,
	Open,
	Paste,
	Preferences,
	Print,
	Quit,
	Redo,
	Refresh,
	Replace,
	Save,
	SaveAs,
	SelectAll,
	Undo,
	ZoomIn,
	ZoomOut,
}

/// Packed codes for one standard shortcut: a primary plus per-platform overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardCodes {
	pub primary: Option<u32>,
	pub win: Option<u32>,
	pub mac: Option<u32>,
	pub linux: Option<u32>,
}

const fn code(combo: KeyCombo) -> Option<u32> {
	Some(combo.bits())
}

const fn primary(combo: KeyCombo) -> StandardCodes {
	StandardCodes {
		primary: code(combo),
		win: None,
		mac: None,
		linux: None,
	}
}

const CMD: KeyMod = KeyMod::CTRL_CMD;
const CMD_SHIFT: KeyMod = KeyMod::CTRL_CMD.union(KeyMod::SHIFT);

impl StandardKeyBinding {
	pub const ALL: &'static [StandardKeyBinding] = &[
		Self::Close,
		Self::Copy,
		Self::Cut,
		Self::Find,
		Self::FullScreen,
		Self::New,
		Self::Open,
		Self::Paste,
		Self::Preferences,
		Self::Print,
		Self::Quit,
		Self::Redo,
		Self::Refresh,
		Self::Replace,
		Self::Save,
		Self::SaveAs,
		Self::SelectAll,
		Self::Undo,
		Self::ZoomIn,
		Self::ZoomOut,
	];

	pub const fn codes(self) -> StandardCodes {
		match self {
			Self::Close => primary(KeyCombo::new(CMD, KeyCode::KeyW)),
			Self::Copy => primary(KeyCombo::new(CMD, KeyCode::KeyC)),
			Self::Cut => primary(KeyCombo::new(CMD, KeyCode::KeyX)),
			Self::Find => primary(KeyCombo::new(CMD, KeyCode::KeyF)),
			Self::FullScreen => StandardCodes {
				primary: code(KeyCombo::new(KeyMod::empty(), KeyCode::F11)),
				win: None,
				mac: code(KeyCombo::new(CMD.union(KeyMod::WIN_CTRL), KeyCode::KeyF)),
				linux: None,
			},
			Self::New => primary(KeyCombo::new(CMD, KeyCode::KeyN)),
			Self::Open => primary(KeyCombo::new(CMD, KeyCode::KeyO)),
			Self::Paste => primary(KeyCombo::new(CMD, KeyCode::KeyV)),
			Self::Preferences => primary(KeyCombo::new(CMD, KeyCode::Comma)),
			Self::Print => primary(KeyCombo::new(CMD, KeyCode::KeyP)),
			Self::Quit => StandardCodes {
				primary: code(KeyCombo::new(CMD, KeyCode::KeyQ)),
				win: code(KeyCombo::new(KeyMod::ALT, KeyCode::F4)),
				mac: None,
				linux: None,
			},
			Self::Redo => StandardCodes {
				primary: code(KeyCombo::new(CMD_SHIFT, KeyCode::KeyZ)),
				win: code(KeyCombo::new(CMD, KeyCode::KeyY)),
				mac: None,
				linux: None,
			},
			Self::Refresh => StandardCodes {
				primary: code(KeyCombo::new(KeyMod::empty(), KeyCode::F5)),
				win: None,
				mac: code(KeyCombo::new(CMD, KeyCode::KeyR)),
				linux: None,
			},
			Self::Replace => StandardCodes {
				primary: code(KeyCombo::new(CMD, KeyCode::KeyH)),
				win: None,
				mac: code(KeyCombo::new(CMD.union(KeyMod::ALT), KeyCode::KeyF)),
				linux: None,
			},
			Self::Save => primary(KeyCombo::new(CMD, KeyCode::KeyS)),
			Self::SaveAs => primary(KeyCombo::new(CMD_SHIFT, KeyCode::KeyS)),
			Self::SelectAll => primary(KeyCombo::new(CMD, KeyCode::KeyA)),
			Self::Undo => primary(KeyCombo::new(CMD, KeyCode::KeyZ)),
			Self::ZoomIn => primary(KeyCombo::new(CMD, KeyCode::Equal)),
			Self::ZoomOut => primary(KeyCombo::new(CMD, KeyCode::Minus)),
		}
	}

	/// Packed code for `os`, platform override first.
	pub fn code_for(self, os: OperatingSystem) -> Option<u32> {
		let codes = self.codes();
		let specific = match os {
			OperatingSystem::Windows => codes.win,
			OperatingSystem::MacOS => codes.mac,
			OperatingSystem::Linux => codes.linux,
		};
		specific.or(codes.primary)
	}

	/// Concrete binding for `os`.
	pub fn resolve(self, os: OperatingSystem) -> Option<KeyBinding> {
		self.code_for(os).and_then(|value| KeyBinding::from_int(value, os).ok())
	}
}
