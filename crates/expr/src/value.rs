//! Runtime values produced by evaluation and stored in contexts.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::EvalError;

#[cfg(test)]
mod tests;

/// A dynamically typed value.
///
/// Derived equality is strict (variant-sensitive, so `Int(1) != Float(1.0)`);
/// the expression `==` operator uses [`Value::loose_eq`] instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	None,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(Arc<str>),
	Bytes(Arc<[u8]>),
	Tuple(Arc<[Value]>),
	List(Arc<[Value]>),
	Set(Arc<[Value]>),
}

impl Value {
	pub fn str(s: impl Into<Arc<str>>) -> Self {
		Self::Str(s.into())
	}

	pub fn bytes(b: impl Into<Arc<[u8]>>) -> Self {
		Self::Bytes(b.into())
	}

	pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
		Self::Tuple(items.into_iter().collect())
	}

	pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
		Self::List(items.into_iter().collect())
	}

	/// Builds a set, dropping elements equal to an earlier one.
	pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
		let mut unique: Vec<Value> = Vec::new();
		for item in items {
			if !unique.iter().any(|seen| seen.loose_eq(&item)) {
				unique.push(item);
			}
		}
		Self::Set(unique.into())
	}

	/// Name of the value's type as shown in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::None => "NoneType",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
			Self::Bytes(_) => "bytes",
			Self::Tuple(_) => "tuple",
			Self::List(_) => "list",
			Self::Set(_) => "set",
		}
	}

	/// Truthiness: `None`, `False`, zero and empty containers are false.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::None => false,
			Self::Bool(b) => *b,
			Self::Int(i) => *i != 0,
			Self::Float(f) => *f != 0.0,
			Self::Str(s) => !s.is_empty(),
			Self::Bytes(b) => !b.is_empty(),
			Self::Tuple(items) | Self::List(items) | Self::Set(items) => !items.is_empty(),
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			Self::Bool(b) => Some(i64::from(*b)),
			_ => None,
		}
	}

	pub(crate) fn number(&self) -> Option<Number> {
		match self {
			Self::Bool(b) => Some(Number::Int(i64::from(*b))),
			Self::Int(i) => Some(Number::Int(*i)),
			Self::Float(f) => Some(Number::Float(*f)),
			_ => None,
		}
	}

	/// Equality as the `==` operator sees it: numbers compare by value across
	/// `bool`/`int`/`float`, sets ignore order.
	pub fn loose_eq(&self, other: &Value) -> bool {
		if let (Some(a), Some(b)) = (self.number(), other.number()) {
			return a.partial_cmp(&b) == Some(Ordering::Equal);
		}
		match (self, other) {
			(Self::None, Self::None) => true,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Bytes(a), Self::Bytes(b)) => a == b,
			(Self::Tuple(a), Self::Tuple(b)) | (Self::List(a), Self::List(b)) => {
				a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loose_eq(y))
			}
			(Self::Set(a), Self::Set(b)) => a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.loose_eq(y))),
			_ => false,
		}
	}

	/// Ordering as the `<`/`>` operators see it.
	///
	/// `Ok(None)` means the operands are comparable but unordered (NaN).
	///
	/// # Errors
	///
	/// Returns [`EvalError::Type`] when the operand types have no ordering.
	pub fn loose_cmp(&self, other: &Value, op: &str) -> Result<Option<Ordering>, EvalError> {
		if let (Some(a), Some(b)) = (self.number(), other.number()) {
			return Ok(a.partial_cmp(&b));
		}
		match (self, other) {
			(Self::Str(a), Self::Str(b)) => Ok(Some(a.cmp(b))),
			(Self::Bytes(a), Self::Bytes(b)) => Ok(Some(a.cmp(b))),
			(Self::Tuple(a), Self::Tuple(b)) | (Self::List(a), Self::List(b)) => {
				for (x, y) in a.iter().zip(b.iter()) {
					if !x.loose_eq(y) {
						return x.loose_cmp(y, op);
					}
				}
				Ok(Some(a.len().cmp(&b.len())))
			}
			_ => Err(EvalError::Type(format!(
				"'{op}' not supported between instances of '{}' and '{}'",
				self.type_name(),
				other.type_name()
			))),
		}
	}

	/// Membership test backing `in` / `not in`; `self` is the container.
	///
	/// # Errors
	///
	/// Returns [`EvalError::Type`] when `self` is not a container or the item
	/// cannot be searched for in it.
	pub fn contains(&self, item: &Value) -> Result<bool, EvalError> {
		match (self, item) {
			(Self::Str(haystack), Self::Str(needle)) => Ok(haystack.contains(&**needle)),
			(Self::Str(_), other) => Err(EvalError::Type(format!(
				"'in <string>' requires string as left operand, not {}",
				other.type_name()
			))),
			(Self::Bytes(haystack), Self::Bytes(needle)) => {
				Ok(needle.is_empty() || haystack.windows(needle.len()).any(|window| window == &**needle))
			}
			(Self::Bytes(haystack), Self::Int(byte)) => match u8::try_from(*byte) {
				Ok(byte) => Ok(haystack.contains(&byte)),
				Err(_) => Err(EvalError::Value("byte must be in range(0, 256)".into())),
			},
			(Self::Tuple(items) | Self::List(items) | Self::Set(items), item) => Ok(items.iter().any(|x| x.loose_eq(item))),
			(other, _) => Err(EvalError::Type(format!(
				"argument of type '{}' is not iterable",
				other.type_name()
			))),
		}
	}
}

/// Numeric view of `bool`, `int` and `float` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
	Int(i64),
	Float(f64),
}

impl Number {
	pub(crate) fn as_f64(self) -> f64 {
		match self {
			Self::Int(i) => i as f64,
			Self::Float(f) => f,
		}
	}
}

impl PartialOrd for Number {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		match (*self, *other) {
			(Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
			(Self::Int(a), Self::Float(b)) => cmp_int_float(a, b),
			(Self::Float(a), Self::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
			(Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
		}
	}
}

/// Exact ordering of an integer against a float, without rounding the integer.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
	// 2^63, exactly representable.
	const BOUND: f64 = 9_223_372_036_854_775_808.0;

	if float.is_nan() {
		return None;
	}
	if float >= BOUND {
		return Some(Ordering::Less);
	}
	if float < -BOUND {
		return Some(Ordering::Greater);
	}
	let whole = float.trunc();
	Some(match int.cmp(&(whole as i64)) {
		Ordering::Equal if float > whole => Ordering::Less,
		Ordering::Equal if float < whole => Ordering::Greater,
		other => other,
	})
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Self::Int(i64::from(i))
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Self::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::Str(s.into())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::Str(s.into())
	}
}

impl From<Vec<u8>> for Value {
	fn from(b: Vec<u8>) -> Self {
		Self::Bytes(b.into())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map_or(Self::None, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => f.write_str("None"),
			Self::Bool(true) => f.write_str("True"),
			Self::Bool(false) => f.write_str("False"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Float(v) => write_float(f, *v),
			Self::Str(s) => write_str_literal(f, s),
			Self::Bytes(b) => write_bytes_literal(f, b),
			Self::Tuple(items) => {
				f.write_char('(')?;
				write_items(f, items)?;
				if items.len() == 1 {
					f.write_char(',')?;
				}
				f.write_char(')')
			}
			Self::List(items) => {
				f.write_char('[')?;
				write_items(f, items)?;
				f.write_char(']')
			}
			Self::Set(items) if items.is_empty() => f.write_str("set()"),
			Self::Set(items) => {
				f.write_char('{')?;
				write_items(f, items)?;
				f.write_char('}')
			}
		}
	}
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
	for (idx, item) in items.iter().enumerate() {
		if idx > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{item}")?;
	}
	Ok(())
}

/// Writes a float so that it lexes back as the same float.
pub(crate) fn write_float(f: &mut impl fmt::Write, v: f64) -> fmt::Result {
	if v.is_nan() {
		f.write_str("nan")
	} else if v.is_infinite() {
		f.write_str(if v > 0.0 { "1e309" } else { "-1e309" })
	} else {
		write!(f, "{v:?}")
	}
}

/// Writes a quoted string literal, preferring single quotes.
pub(crate) fn write_str_literal(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
	let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
	f.write_char(quote)?;
	for ch in s.chars() {
		match ch {
			'\\' => f.write_str("\\\\")?,
			'\n' => f.write_str("\\n")?,
			'\r' => f.write_str("\\r")?,
			'\t' => f.write_str("\\t")?,
			c if c == quote => {
				f.write_char('\\')?;
				f.write_char(c)?;
			}
			c if c.is_control() && (c as u32) <= 0xFF => write!(f, "\\x{:02x}", c as u32)?,
			c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
			c => f.write_char(c)?,
		}
	}
	f.write_char(quote)
}

/// Writes a `b'...'` literal.
pub(crate) fn write_bytes_literal(f: &mut impl fmt::Write, bytes: &[u8]) -> fmt::Result {
	let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') { b'"' } else { b'\'' };
	f.write_char('b')?;
	f.write_char(quote as char)?;
	for &byte in bytes {
		match byte {
			b'\\' => f.write_str("\\\\")?,
			b'\n' => f.write_str("\\n")?,
			b'\r' => f.write_str("\\r")?,
			b'\t' => f.write_str("\\t")?,
			b if b == quote => {
				f.write_char('\\')?;
				f.write_char(b as char)?;
			}
			0x20..=0x7e => f.write_char(byte as char)?,
			_ => write!(f, "\\x{byte:02x}")?,
		}
	}
	f.write_char(quote as char)
}

/// Hash consistent with strict equality, used for structural hashing of
/// constants.
pub(crate) fn hash_float<H: Hasher>(v: f64, state: &mut H) {
	v.to_bits().hash(state);
}
