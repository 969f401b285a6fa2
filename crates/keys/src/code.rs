//! Key codes and their canonical names.
//!
//! Every code fits in the low byte of a packed keybinding word. Names are
//! matched case-insensitively; the first listed name is canonical and is what
//! [`KeyCode::name`] returns.

use std::fmt;
use std::str::FromStr;

use crate::KeyError;

macro_rules! key_codes {
	($($variant:ident = $value:literal => $name:literal $(| $alias:literal)*),+ $(,)?) => {
		/// A physical key, independent of modifiers.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		#[repr(u8)]
		pub enum KeyCode {
			$(
				#[doc = $name]
				$variant = $value,
			)+
		}

		impl KeyCode {
			/// All key codes in numeric order.
			pub const ALL: &'static [KeyCode] = &[$(KeyCode::$variant),+];

			/// Decodes the low byte of a packed keybinding.
			pub fn from_u8(value: u8) -> Option<Self> {
				match value {
					$($value => Some(KeyCode::$variant),)+
					_ => None,
				}
			}

			/// Canonical display name.
			pub fn name(self) -> &'static str {
				match self {
					$(KeyCode::$variant => $name,)+
				}
			}

			/// Looks up a key by canonical name or alias, ignoring ASCII case.
			pub fn from_name(token: &str) -> Option<Self> {
				$(
					if token.eq_ignore_ascii_case($name) $(|| token.eq_ignore_ascii_case($alias))* {
						return Some(KeyCode::$variant);
					}
				)+
				None
			}
		}
	};
}

key_codes! {
	Backspace = 1 => "Backspace",
	Tab = 2 => "Tab",
	Enter = 3 => "Enter" | "Return",
	Shift = 4 => "Shift",
	Ctrl = 5 => "Ctrl" | "Control",
	Alt = 6 => "Alt" | "Option",
	PauseBreak = 7 => "PauseBreak" | "Pause",
	CapsLock = 8 => "CapsLock",
	Escape = 9 => "Escape" | "Esc",
	Space = 10 => "Space",
	PageUp = 11 => "PageUp" | "PgUp",
	PageDown = 12 => "PageDown" | "PgDn",
	End = 13 => "End",
	Home = 14 => "Home",
	LeftArrow = 15 => "Left" | "LeftArrow" | "ArrowLeft",
	UpArrow = 16 => "Up" | "UpArrow" | "ArrowUp",
	RightArrow = 17 => "Right" | "RightArrow" | "ArrowRight",
	DownArrow = 18 => "Down" | "DownArrow" | "ArrowDown",
	Insert = 19 => "Insert" | "Ins",
	Delete = 20 => "Delete" | "Del",
	Digit0 = 21 => "0",
	Digit1 = 22 => "1",
	Digit2 = 23 => "2",
	Digit3 = 24 => "3",
	Digit4 = 25 => "4",
	Digit5 = 26 => "5",
	Digit6 = 27 => "6",
	Digit7 = 28 => "7",
	Digit8 = 29 => "8",
	Digit9 = 30 => "9",
	KeyA = 31 => "A",
	KeyB = 32 => "B",
	KeyC = 33 => "C",
	KeyD = 34 => "D",
	KeyE = 35 => "E",
	KeyF = 36 => "F",
	KeyG = 37 => "G",
	KeyH = 38 => "H",
	KeyI = 39 => "I",
	KeyJ = 40 => "J",
	KeyK = 41 => "K",
	KeyL = 42 => "L",
	KeyM = 43 => "M",
	KeyN = 44 => "N",
	KeyO = 45 => "O",
	KeyP = 46 => "P",
	KeyQ = 47 => "Q",
	KeyR = 48 => "R",
	KeyS = 49 => "S",
	KeyT = 50 => "T",
	KeyU = 51 => "U",
	KeyV = 52 => "V",
	KeyW = 53 => "W",
	KeyX = 54 => "X",
	KeyY = 55 => "Y",
	KeyZ = 56 => "Z",
	Meta = 57 => "Meta" | "Win" | "Cmd" | "Super",
	ContextMenu = 58 => "ContextMenu" | "Menu",
	F1 = 59 => "F1",
	F2 = 60 => "F2",
	F3 = 61 => "F3",
	F4 = 62 => "F4",
	F5 = 63 => "F5",
	F6 = 64 => "F6",
	F7 = 65 => "F7",
	F8 = 66 => "F8",
	F9 = 67 => "F9",
	F10 = 68 => "F10",
	F11 = 69 => "F11",
	F12 = 70 => "F12",
	F13 = 71 => "F13",
	F14 = 72 => "F14",
	F15 = 73 => "F15",
	F16 = 74 => "F16",
	F17 = 75 => "F17",
	F18 = 76 => "F18",
	F19 = 77 => "F19",
	NumLock = 78 => "NumLock",
	ScrollLock = 79 => "ScrollLock",
	Semicolon = 80 => ";" | "Semicolon",
	Equal = 81 => "=" | "Equal" | "Equals",
	Comma = 82 => "," | "Comma",
	Minus = 83 => "-" | "Minus" | "Dash",
	Period = 84 => "." | "Period" | "Dot",
	Slash = 85 => "/" | "Slash",
	Backquote = 86 => "`" | "Backquote" | "Backtick",
	BracketLeft = 87 => "[" | "BracketLeft",
	Backslash = 88 => "\\" | "Backslash",
	BracketRight = 89 => "]" | "BracketRight",
	Quote = 90 => "'" | "Quote",
	IntlBackslash = 91 => "IntlBackslash",
	Numpad0 = 92 => "Numpad0",
	Numpad1 = 93 => "Numpad1",
	Numpad2 = 94 => "Numpad2",
	Numpad3 = 95 => "Numpad3",
	Numpad4 = 96 => "Numpad4",
	Numpad5 = 97 => "Numpad5",
	Numpad6 = 98 => "Numpad6",
	Numpad7 = 99 => "Numpad7",
	Numpad8 = 100 => "Numpad8",
	Numpad9 = 101 => "Numpad9",
	NumpadMultiply = 102 => "NumpadMultiply",
	NumpadAdd = 103 => "NumpadAdd",
	NumpadSeparator = 104 => "NumpadSeparator",
	NumpadSubtract = 105 => "NumpadSubtract",
	NumpadDecimal = 106 => "NumpadDecimal",
	NumpadDivide = 107 => "NumpadDivide",
}

impl KeyCode {
	/// Returns true for keys that are themselves modifiers.
	pub fn is_modifier(self) -> bool {
		matches!(self, KeyCode::Shift | KeyCode::Ctrl | KeyCode::Alt | KeyCode::Meta)
	}

	/// Name used when rendering for macOS menus.
	pub(crate) fn mac_symbol(self) -> &'static str {
		match self {
			KeyCode::Enter => "↩",
			KeyCode::Escape => "⎋",
			KeyCode::Tab => "⇥",
			KeyCode::Backspace => "⌫",
			KeyCode::Delete => "⌦",
			KeyCode::LeftArrow => "←",
			KeyCode::UpArrow => "↑",
			KeyCode::RightArrow => "→",
			KeyCode::DownArrow => "↓",
			KeyCode::PageUp => "⇞",
			KeyCode::PageDown => "⇟",
			KeyCode::Home => "↖",
			KeyCode::End => "↘",
			KeyCode::Space => "␣",
			other => other.name(),
		}
	}
}

impl fmt::Display for KeyCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for KeyCode {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		KeyCode::from_name(s).ok_or_else(|| KeyError::UnknownKey(s.to_string()))
	}
}
