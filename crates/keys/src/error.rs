use thiserror::Error;

/// Errors produced while parsing, decoding or encoding keybindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
	/// The shortcut text was empty.
	#[error("keybinding is empty")]
	Empty,
	/// Only modifiers were given, or a separator had nothing after it.
	#[error("keybinding has no key after its modifiers")]
	MissingKey,
	/// A token in modifier position is not a modifier.
	#[error("unknown modifier '{0}'")]
	UnknownModifier(String),
	/// A stray token that is neither a modifier nor a key.
	#[error("unexpected token '{0}'")]
	UnknownToken(String),
	/// The key token is not a known key name.
	#[error("unknown key '{0}'")]
	UnknownKey(String),
	/// A packed value does not carry a known key code.
	#[error("invalid key code in packed value {0:#x}")]
	InvalidCode(u32),
	/// The packed form holds at most two parts.
	#[error("chord of {0} parts cannot be packed into an integer")]
	ChordTooLong(usize),
}
