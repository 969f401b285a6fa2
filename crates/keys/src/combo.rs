//! Integer packing of modifier+key combinations and two-part chords.
//!
//! Layout of one part (lower 16 bits):
//!
//! ```text
//! bits 0-7   key code
//! bit  8     WinCtrl  (Ctrl on macOS, Win/Super elsewhere)
//! bit  9     Alt
//! bit  10    Shift
//! bit  11    CtrlCmd  (Cmd on macOS, Ctrl elsewhere)
//! ```
//!
//! A chord stores its second part in bits 16-31.

use std::ops::BitOr;

use bitflags::bitflags;

use crate::KeyCode;

/// Mask selecting the key code of one part.
pub const KEY_CODE_MASK: u32 = 0x0000_00FF;
/// Mask selecting one whole part (key code plus modifiers).
pub const PART_MASK: u32 = 0x0000_FFFF;

bitflags! {
	/// Platform-relative modifier bits.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct KeyMod: u32 {
		/// Ctrl on macOS, the Windows/Super key elsewhere.
		const WIN_CTRL = 1 << 8;
		const ALT = 1 << 9;
		const SHIFT = 1 << 10;
		/// The primary accelerator: Cmd on macOS, Ctrl elsewhere.
		const CTRL_CMD = 1 << 11;
	}
}

/// A single packed modifier+key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo(u32);

impl KeyCombo {
	/// Packs modifiers and a key code.
	pub const fn new(mods: KeyMod, key: KeyCode) -> Self {
		Self(mods.bits() | key as u32)
	}

	/// The raw packed value.
	pub const fn bits(self) -> u32 {
		self.0
	}

	pub fn key(self) -> Option<KeyCode> {
		KeyCode::from_u8((self.0 & KEY_CODE_MASK) as u8)
	}

	pub fn mods(self) -> KeyMod {
		KeyMod::from_bits_truncate(self.0)
	}
}

impl From<KeyCode> for KeyCombo {
	fn from(key: KeyCode) -> Self {
		Self::new(KeyMod::empty(), key)
	}
}

impl From<KeyCombo> for u32 {
	fn from(combo: KeyCombo) -> Self {
		combo.0
	}
}

impl BitOr<KeyCode> for KeyMod {
	type Output = KeyCombo;

	fn bitor(self, key: KeyCode) -> KeyCombo {
		KeyCombo::new(self, key)
	}
}

/// Two sequential combinations packed into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord(u32);

impl KeyChord {
	pub fn new(first: impl Into<KeyCombo>, second: impl Into<KeyCombo>) -> Self {
		let first = first.into().bits() & PART_MASK;
		let second = second.into().bits() & PART_MASK;
		Self(first | (second << 16))
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	pub const fn first(self) -> KeyCombo {
		KeyCombo(self.0 & PART_MASK)
	}

	pub const fn second(self) -> KeyCombo {
		KeyCombo((self.0 >> 16) & PART_MASK)
	}
}

impl From<KeyChord> for u32 {
	fn from(chord: KeyChord) -> Self {
		chord.0
	}
}

/// Splits a packed value into its non-zero parts.
pub fn split_parts(value: u32) -> impl Iterator<Item = u32> {
	let first = value & PART_MASK;
	let second = (value >> 16) & PART_MASK;
	std::iter::once(first).chain((second != 0).then_some(second))
}
