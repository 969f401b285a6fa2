//! Tokenizer for expression text.

use crate::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
	Name(String),
	/// Integer literal magnitude; the sign is applied by the parser.
	Int(u64),
	Float(f64),
	Str(String),
	Bytes(Vec<u8>),
	/// f-string literal, rejected by the parser.
	FString,
	/// Integer or float literal with a `j` suffix, rejected by the parser.
	Imaginary,
	Op(&'static str),
	End,
}

#[derive(Debug, Clone)]
pub(crate) struct Spanned {
	pub token: Token,
	pub position: usize,
}

const OPERATORS: &[&str] = &[
	"**=", "//=", ">>=", "<<=", "...", "**", "//", "<<", ">>", "<=", ">=", "==", "!=", ":=", "->", "+=", "-=", "*=", "/=", "%=",
	"&=", "|=", "^=", "@=", "+", "-", "*", "/", "%", "@", "&", "|", "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":",
	".", ";", "=",
];

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
	let mut lexer = Lexer { input, position: 0 };
	let mut tokens = Vec::new();
	loop {
		lexer.skip_whitespace()?;
		let position = lexer.position;
		let token = lexer.next_token()?;
		let end = token == Token::End;
		tokens.push(Spanned { token, position });
		if end {
			return Ok(tokens);
		}
	}
}

struct Lexer<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Lexer<'a> {
	fn rest(&self) -> &'a str {
		&self.input[self.position..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn peek_nth(&self, n: usize) -> Option<char> {
		self.rest().chars().nth(n)
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
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

	fn error(&self, message: impl Into<String>) -> ParseError {
		ParseError::new(message, self.position)
	}

	fn skip_whitespace(&mut self) -> Result<(), ParseError> {
		loop {
			self.take_while(|ch| ch == ' ' || ch == '\t' || ch == '\n' || ch == '\r' || ch == '\x0c');
			match self.peek() {
				Some('\\') if matches!(self.peek_nth(1), Some('\n')) => {
					self.position += 2;
				}
				Some('#') => return Err(self.error("comments are not allowed in expressions")),
				_ => return Ok(()),
			}
		}
	}

	fn next_token(&mut self) -> Result<Token, ParseError> {
		let Some(ch) = self.peek() else {
			return Ok(Token::End);
		};
		if ch.is_ascii_digit() || (ch == '.' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())) {
			return self.number();
		}
		if ch == '_' || ch.is_alphabetic() {
			return self.word();
		}
		if ch == '\'' || ch == '"' {
			return self.string("").map(|s| s.into_token());
		}
		for op in OPERATORS {
			if self.rest().starts_with(op) {
				self.position += op.len();
				return Ok(Token::Op(*op));
			}
		}
		Err(self.error(format!("unexpected character '{ch}'")))
	}

	fn word(&mut self) -> Result<Token, ParseError> {
		let word = self.take_while(|ch| ch == '_' || ch.is_alphanumeric());
		if matches!(self.peek(), Some('\'' | '"')) {
			let prefix = word.to_ascii_lowercase();
			if matches!(prefix.as_str(), "b" | "r" | "u" | "f" | "br" | "rb" | "fr" | "rf") {
				return self.string(&prefix).map(|s| s.into_token());
			}
		}
		Ok(Token::Name(word.to_owned()))
	}

	fn number(&mut self) -> Result<Token, ParseError> {
		let start = self.position;
		if self.peek() == Some('0') && matches!(self.peek_nth(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
			self.position += 1;
			let radix = match self.next() {
				Some('x' | 'X') => 16,
				Some('o' | 'O') => 8,
				_ => 2,
			};
			let digits = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
			let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
			return u64::from_str_radix(&cleaned, radix)
				.map(Token::Int)
				.map_err(|_| ParseError::new(format!("invalid integer literal '{}'", &self.input[start..self.position]), start));
		}

		let mut is_float = false;
		self.take_while(|ch| ch.is_ascii_digit() || ch == '_');
		if self.peek() == Some('.') {
			is_float = true;
			self.position += 1;
			self.take_while(|ch| ch.is_ascii_digit() || ch == '_');
		}
		if matches!(self.peek(), Some('e' | 'E')) {
			let save = self.position;
			self.position += 1;
			if matches!(self.peek(), Some('+' | '-')) {
				self.position += 1;
			}
			if self.take_while(|ch| ch.is_ascii_digit()).is_empty() {
				self.position = save;
			} else {
				is_float = true;
			}
		}
		if matches!(self.peek(), Some('j' | 'J')) {
			self.position += 1;
			return Ok(Token::Imaginary);
		}
		if self.peek().is_some_and(|ch| ch == '_' || ch.is_alphabetic()) {
			return Err(self.error("invalid numeric literal"));
		}

		let text: String = self.input[start..self.position].chars().filter(|c| *c != '_').collect();
		if is_float {
			text.parse::<f64>()
				.map(Token::Float)
				.map_err(|_| ParseError::new(format!("invalid float literal '{text}'"), start))
		} else {
			if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
				return Err(ParseError::new("leading zeros in decimal integer literals are not permitted", start));
			}
			text.parse::<u64>()
				.map(Token::Int)
				.map_err(|_| ParseError::new(format!("integer literal '{text}' is out of range"), start))
		}
	}

	fn string(&mut self, prefix: &str) -> Result<StrLiteral, ParseError> {
		let start = self.position;
		let raw = prefix.contains('r');
		let bytes = prefix.contains('b');
		let fstring = prefix.contains('f');
		let Some(quote) = self.next() else {
			return Err(self.error("expected string literal"));
		};
		let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
		if triple {
			self.position += 2;
		}

		let mut out = String::new();
		loop {
			let Some(ch) = self.next() else {
				return Err(ParseError::new("unterminated string literal", start));
			};
			if bytes && !ch.is_ascii() {
				return Err(non_ascii_bytes(start));
			}
			if ch == quote {
				if !triple {
					break;
				}
				if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
					self.position += 2;
					break;
				}
				out.push(ch);
				continue;
			}
			if ch == '\n' && !triple {
				return Err(ParseError::new("unterminated string literal", start));
			}
			if ch != '\\' {
				out.push(ch);
				continue;
			}
			let Some(escaped) = self.next() else {
				return Err(ParseError::new("unterminated string literal", start));
			};
			if bytes && !escaped.is_ascii() {
				return Err(non_ascii_bytes(start));
			}
			if raw {
				out.push('\\');
				out.push(escaped);
				continue;
			}
			self.escape(escaped, bytes, &mut out)?;
		}

		if fstring {
			return Ok(StrLiteral::FString);
		}
		if bytes {
			if out.chars().any(|c| c as u32 > 0xFF) {
				return Err(ParseError::new("bytes escape sequence out of range", start));
			}
			return Ok(StrLiteral::Bytes(out.chars().map(|c| c as u8).collect()));
		}
		Ok(StrLiteral::Str(out))
	}

	fn escape(&mut self, escaped: char, bytes: bool, out: &mut String) -> Result<(), ParseError> {
		let simple = match escaped {
			'\n' => return Ok(()),
			'\\' => '\\',
			'\'' => '\'',
			'"' => '"',
			'n' => '\n',
			'r' => '\r',
			't' => '\t',
			'a' => '\x07',
			'b' => '\x08',
			'f' => '\x0c',
			'v' => '\x0b',
			'0'..='7' => {
				let mut value = escaped.to_digit(8).unwrap_or_default();
				for _ in 0..2 {
					match self.peek().and_then(|c| c.to_digit(8)) {
						Some(digit) => {
							value = value * 8 + digit;
							self.position += 1;
						}
						None => break,
					}
				}
				return self.push_code(value, out);
			}
			'x' => return self.hex_escape(2, out),
			'u' if !bytes => return self.hex_escape(4, out),
			'U' if !bytes => return self.hex_escape(8, out),
			other => {
				out.push('\\');
				other
			}
		};
		out.push(simple);
		Ok(())
	}

	fn hex_escape(&mut self, digits: usize, out: &mut String) -> Result<(), ParseError> {
		let start = self.position;
		let hex = self.rest().get(..digits).filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()));
		let Some(hex) = hex else {
			return Err(ParseError::new("truncated escape sequence", start));
		};
		self.position += digits;
		let value = u32::from_str_radix(hex, 16).map_err(|_| ParseError::new("invalid escape sequence", start))?;
		self.push_code(value, out)
	}

	fn push_code(&self, value: u32, out: &mut String) -> Result<(), ParseError> {
		let ch = char::from_u32(value).ok_or_else(|| self.error("invalid character code in escape sequence"))?;
		out.push(ch);
		Ok(())
	}
}

fn non_ascii_bytes(start: usize) -> ParseError {
	ParseError::new("bytes can only contain ASCII literal characters", start)
}

enum StrLiteral {
	Str(String),
	Bytes(Vec<u8>),
	FString,
}

impl StrLiteral {
	fn into_token(self) -> Token {
		match self {
			Self::Str(s) => Token::Str(s),
			Self::Bytes(b) => Token::Bytes(b),
			Self::FString => Token::FString,
		}
	}
}
