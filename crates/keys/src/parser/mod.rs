//! # Parser
//!
//! Parses plain-text shortcuts such as `"Ctrl+Shift+P"` or `"cmd-k cmd-w"`
//! into [`KeyBinding`]s.
//!
//! ## Supported Syntax
//!
//! ```text
//! binding   = part (" " part)*
//! part      = (modifier sep)* key
//! sep       = "+" | "-"
//! modifier  = "ctrl" | "shift" | "alt" | "meta" | "win" | "cmd" | ...
//! key       = key name or alias, see KeyCode
//! ```
//!
//! Tokens are case-insensitive. A separator character may itself be the key
//! when it is the last character of a part (`"ctrl+-"`, `"ctrl++"`).

use crate::{KeyBinding, KeyCode, KeyError, SimpleKeyBinding};

#[cfg(test)]
mod tests;

/// Concrete modifier named in shortcut text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
	Ctrl,
	Shift,
	Alt,
	Meta,
}

impl Modifier {
	fn from_token(token: &str) -> Option<Self> {
		match token.to_ascii_lowercase().as_str() {
			"ctrl" | "control" | "ctl" => Some(Self::Ctrl),
			"shift" => Some(Self::Shift),
			"alt" | "opt" | "option" => Some(Self::Alt),
			"meta" | "win" | "cmd" | "command" | "super" => Some(Self::Meta),
			_ => None,
		}
	}
}

fn is_sep(ch: char) -> bool {
	ch == '+' || ch == '-'
}

/// Cursor over one whitespace-free part of a shortcut.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn rest(&self) -> &'a str {
		&self.input[self.position..]
	}

	fn is_end(&self) -> bool {
		self.position >= self.input.len()
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.rest().chars().next()?;
		self.position += ch.len_utf8();
		Some(ch)
	}

	fn take_while<F>(&mut self, predicate: F) -> &'a str
	where
		F: Fn(char) -> bool,
	{
		let rest = self.rest();
		let len = rest.find(|ch: char| !predicate(ch)).unwrap_or(rest.len());
		self.position += len;
		&rest[..len]
	}

	/// Splits the part into tokens on `+`/`-`.
	fn tokens(&mut self) -> Result<Vec<&'a str>, KeyError> {
		let mut tokens = Vec::new();

		loop {
			let start = self.position;
			let token = self.take_while(|ch| !is_sep(ch));
			if token.is_empty() {
				match self.next() {
					// A trailing separator is the key itself.
					Some(_) if self.is_end() => {
						tokens.push(&self.input[start..self.position]);
						break;
					}
					Some(ch) => return Err(KeyError::UnknownToken(ch.to_string())),
					None => break,
				}
			}

			tokens.push(token);
			match self.next() {
				None => break,
				Some(_) if self.is_end() => return Err(KeyError::MissingKey),
				Some(_) => {}
			}
		}

		Ok(tokens)
	}
}

/// Parses a single modifier+key part such as `"Ctrl+Shift+A"`.
///
/// # Errors
///
/// Returns a [`KeyError`] describing the first invalid token.
pub fn parse_part(s: &str) -> Result<SimpleKeyBinding, KeyError> {
	let s = s.trim();
	if s.is_empty() {
		return Err(KeyError::Empty);
	}

	let tokens = Parser::new(s).tokens()?;
	let Some((key_token, modifiers)) = tokens.split_last() else {
		return Err(KeyError::Empty);
	};

	let key = KeyCode::from_name(key_token).ok_or_else(|| KeyError::UnknownKey(key_token.to_string()))?;
	let mut binding = SimpleKeyBinding::new(key);
	for token in modifiers {
		match Modifier::from_token(token) {
			Some(Modifier::Ctrl) => binding.ctrl = true,
			Some(Modifier::Shift) => binding.shift = true,
			Some(Modifier::Alt) => binding.alt = true,
			Some(Modifier::Meta) => binding.meta = true,
			None => return Err(KeyError::UnknownModifier(token.to_string())),
		}
	}

	Ok(binding)
}

/// Parses a whitespace-separated sequence of parts into a [`KeyBinding`].
///
/// # Errors
///
/// Returns a [`KeyError`] if the text is empty or any part fails to parse.
pub fn parse(s: &str) -> Result<KeyBinding, KeyError> {
	let parts = s.split_whitespace().map(parse_part).collect::<Result<Vec<_>, _>>()?;
	KeyBinding::new(parts)
}
