//! Platform-resolved keybindings.
//!
//! A [`SimpleKeyBinding`] names concrete modifiers (`ctrl` is always the key
//! labelled Ctrl, `meta` is Cmd/Win/Super). The packed integer form instead
//! uses the platform-relative [`KeyMod::CTRL_CMD`] and [`KeyMod::WIN_CTRL`]
//! bits, so converting between the two requires an [`OperatingSystem`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::combo::{KEY_CODE_MASK, PART_MASK, split_parts};
use crate::{KeyCode, KeyError, KeyMod, OperatingSystem, parser};

#[cfg(test)]
mod tests;

/// One modifier+key press with concrete modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleKeyBinding {
	pub ctrl: bool,
	pub shift: bool,
	pub alt: bool,
	pub meta: bool,
	pub key: KeyCode,
}

impl SimpleKeyBinding {
	/// A press of `key` with no modifiers.
	pub const fn new(key: KeyCode) -> Self {
		Self {
			ctrl: false,
			shift: false,
			alt: false,
			meta: false,
			key,
		}
	}

	pub const fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	pub const fn shift(self) -> Self {
		Self { shift: true, ..self }
	}

	pub const fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	pub const fn meta(self) -> Self {
		Self { meta: true, ..self }
	}

	/// Decodes one packed part for `os`.
	///
	/// # Errors
	///
	/// Returns [`KeyError::InvalidCode`] if the low byte is not a known key.
	pub fn from_int(value: u32, os: OperatingSystem) -> Result<Self, KeyError> {
		let key = KeyCode::from_u8((value & KEY_CODE_MASK) as u8).ok_or(KeyError::InvalidCode(value))?;
		let mods = KeyMod::from_bits_truncate(value & PART_MASK);
		let ctrl_cmd = mods.contains(KeyMod::CTRL_CMD);
		let win_ctrl = mods.contains(KeyMod::WIN_CTRL);
		let (ctrl, meta) = if os.is_mac() { (win_ctrl, ctrl_cmd) } else { (ctrl_cmd, win_ctrl) };

		Ok(Self {
			ctrl,
			shift: mods.contains(KeyMod::SHIFT),
			alt: mods.contains(KeyMod::ALT),
			meta,
			key,
		})
	}

	/// Packs this press for `os`.
	pub fn to_int(&self, os: OperatingSystem) -> u32 {
		let mut mods = KeyMod::empty();
		let (ctrl_bit, meta_bit) = if os.is_mac() {
			(KeyMod::WIN_CTRL, KeyMod::CTRL_CMD)
		} else {
			(KeyMod::CTRL_CMD, KeyMod::WIN_CTRL)
		};
		mods.set(ctrl_bit, self.ctrl);
		mods.set(meta_bit, self.meta);
		mods.set(KeyMod::SHIFT, self.shift);
		mods.set(KeyMod::ALT, self.alt);
		mods.bits() | self.key as u32
	}

	/// True when the pressed key is itself a modifier (e.g. `Ctrl+Shift`).
	pub fn is_modifier_only(&self) -> bool {
		self.key.is_modifier()
	}

	/// Renders the press the way `os` labels shortcuts in menus.
	pub fn display_for(&self, os: OperatingSystem) -> String {
		if os.is_mac() {
			let mut out = String::new();
			if self.ctrl {
				out.push('⌃');
			}
			if self.alt {
				out.push('⌥');
			}
			if self.shift {
				out.push('⇧');
			}
			if self.meta {
				out.push('⌘');
			}
			out.push_str(self.key.mac_symbol());
			return out;
		}

		let mut parts: SmallVec<[&str; 5]> = SmallVec::new();
		if self.ctrl {
			parts.push("Ctrl");
		}
		if self.shift {
			parts.push("Shift");
		}
		if self.alt {
			parts.push("Alt");
		}
		if self.meta {
			parts.push(os.meta_name());
		}
		parts.push(self.key.name());
		parts.join("+")
	}
}

impl From<KeyCode> for SimpleKeyBinding {
	fn from(key: KeyCode) -> Self {
		Self::new(key)
	}
}

impl fmt::Display for SimpleKeyBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.ctrl {
			f.write_str("Ctrl+")?;
		}
		if self.shift {
			f.write_str("Shift+")?;
		}
		if self.alt {
			f.write_str("Alt+")?;
		}
		if self.meta {
			f.write_str("Meta+")?;
		}
		f.write_str(self.key.name())
	}
}

impl FromStr for SimpleKeyBinding {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parser::parse_part(s)
	}
}

/// A non-empty sequence of presses; more than one part is a chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
	parts: SmallVec<[SimpleKeyBinding; 2]>,
}

impl KeyBinding {
	/// Builds a binding from its parts.
	///
	/// # Errors
	///
	/// Returns [`KeyError::Empty`] if `parts` is empty.
	pub fn new(parts: impl IntoIterator<Item = SimpleKeyBinding>) -> Result<Self, KeyError> {
		let parts: SmallVec<[SimpleKeyBinding; 2]> = parts.into_iter().collect();
		if parts.is_empty() {
			return Err(KeyError::Empty);
		}
		Ok(Self { parts })
	}

	pub fn single(part: SimpleKeyBinding) -> Self {
		let mut parts = SmallVec::new();
		parts.push(part);
		Self { parts }
	}

	pub fn parts(&self) -> &[SimpleKeyBinding] {
		&self.parts
	}

	pub fn first(&self) -> &SimpleKeyBinding {
		&self.parts[0]
	}

	pub fn is_chord(&self) -> bool {
		self.parts.len() > 1
	}

	/// True when any part presses only a modifier key.
	pub fn is_modifier_only(&self) -> bool {
		self.parts.iter().any(SimpleKeyBinding::is_modifier_only)
	}

	/// Decodes a packed single combination or two-part chord.
	///
	/// # Errors
	///
	/// Returns [`KeyError::InvalidCode`] if either part carries an unknown key.
	pub fn from_int(value: u32, os: OperatingSystem) -> Result<Self, KeyError> {
		let parts = split_parts(value)
			.map(|part| SimpleKeyBinding::from_int(part, os))
			.collect::<Result<SmallVec<_>, _>>()?;
		Ok(Self { parts })
	}

	/// Packs this binding for `os`.
	///
	/// # Errors
	///
	/// Returns [`KeyError::ChordTooLong`] for bindings with more than two parts,
	/// which the packed form cannot represent.
	pub fn to_int(&self, os: OperatingSystem) -> Result<u32, KeyError> {
		match self.parts.as_slice() {
			[only] => Ok(only.to_int(os)),
			[first, second] => Ok(first.to_int(os) | (second.to_int(os) << 16)),
			parts => Err(KeyError::ChordTooLong(parts.len())),
		}
	}

	/// Renders every part for `os`, space separated.
	pub fn display_for(&self, os: OperatingSystem) -> String {
		self.parts.iter().map(|part| part.display_for(os)).collect::<Vec<_>>().join(" ")
	}
}

impl From<SimpleKeyBinding> for KeyBinding {
	fn from(part: SimpleKeyBinding) -> Self {
		Self::single(part)
	}
}

impl fmt::Display for KeyBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, part) in self.parts.iter().enumerate() {
			if idx > 0 {
				f.write_str(" ")?;
			}
			write!(f, "{part}")?;
		}
		Ok(())
	}
}

impl FromStr for KeyBinding {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parser::parse(s)
	}
}

impl Serialize for KeyBinding {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for KeyBinding {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		text.parse().map_err(serde::de::Error::custom)
	}
}

/// Where a rule's keybinding comes from: a packed integer or a shortcut string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyBindingSource {
	Code(u32),
	Text(String),
}

impl KeyBindingSource {
	/// Resolves the source into a concrete binding for `os`.
	///
	/// # Errors
	///
	/// Propagates decode or parse failures.
	pub fn resolve(&self, os: OperatingSystem) -> Result<KeyBinding, KeyError> {
		match self {
			Self::Code(value) => KeyBinding::from_int(*value, os),
			Self::Text(text) => text.parse(),
		}
	}
}

impl From<u32> for KeyBindingSource {
	fn from(value: u32) -> Self {
		Self::Code(value)
	}
}

impl From<crate::KeyCombo> for KeyBindingSource {
	fn from(combo: crate::KeyCombo) -> Self {
		Self::Code(combo.bits())
	}
}

impl From<crate::KeyChord> for KeyBindingSource {
	fn from(chord: crate::KeyChord) -> Self {
		Self::Code(chord.bits())
	}
}

impl From<KeyCode> for KeyBindingSource {
	fn from(key: KeyCode) -> Self {
		Self::Code(key as u32)
	}
}

impl From<&str> for KeyBindingSource {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for KeyBindingSource {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}
