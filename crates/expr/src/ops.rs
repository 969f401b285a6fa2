//! Operator kinds, their text form and their semantics.

use std::sync::Arc;

use crate::value::Number;
use crate::{EvalError, Value};

/// Binding strength used by the parser and the serializer; higher binds tighter.
pub(crate) mod prec {
	pub const TEST: u8 = 1;
	pub const OR: u8 = 2;
	pub const AND: u8 = 3;
	pub const NOT: u8 = 4;
	pub const CMP: u8 = 5;
	pub const BIT_OR: u8 = 6;
	pub const BIT_XOR: u8 = 7;
	pub const BIT_AND: u8 = 8;
	pub const SHIFT: u8 = 9;
	pub const ARITH: u8 = 10;
	pub const TERM: u8 = 11;
	pub const FACTOR: u8 = 12;
	pub const POWER: u8 = 13;
	pub const ATOM: u8 = 14;
}

/// Infix arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	FloorDiv,
	Mod,
	Pow,
	MatMul,
	LShift,
	RShift,
	BitAnd,
	BitOr,
	BitXor,
}

impl BinaryOp {
	pub const ALL: &'static [BinaryOp] = &[
		Self::Add,
		Self::Sub,
		Self::Mul,
		Self::Div,
		Self::FloorDiv,
		Self::Mod,
		Self::Pow,
		Self::MatMul,
		Self::LShift,
		Self::RShift,
		Self::BitAnd,
		Self::BitOr,
		Self::BitXor,
	];

	pub fn symbol(self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Sub => "-",
			Self::Mul => "*",
			Self::Div => "/",
			Self::FloorDiv => "//",
			Self::Mod => "%",
			Self::Pow => "**",
			Self::MatMul => "@",
			Self::LShift => "<<",
			Self::RShift => ">>",
			Self::BitAnd => "&",
			Self::BitOr => "|",
			Self::BitXor => "^",
		}
	}

	pub(crate) fn precedence(self) -> u8 {
		match self {
			Self::BitOr => prec::BIT_OR,
			Self::BitXor => prec::BIT_XOR,
			Self::BitAnd => prec::BIT_AND,
			Self::LShift | Self::RShift => prec::SHIFT,
			Self::Add | Self::Sub => prec::ARITH,
			Self::Mul | Self::Div | Self::FloorDiv | Self::Mod | Self::MatMul => prec::TERM,
			Self::Pow => prec::POWER,
		}
	}

	/// Applies the operator.
	///
	/// # Errors
	///
	/// Type mismatches, division by zero and integer overflow.
	pub fn apply(self, left: &Value, right: &Value) -> Result<Value, EvalError> {
		if let (Some(a), Some(b)) = (left.number(), right.number()) {
			if let Some(result) = self.apply_bool(left, right) {
				return Ok(result);
			}
			return self.apply_numbers(a, b);
		}

		match (self, left, right) {
			(Self::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}").into())),
			(Self::Add, Value::Bytes(a), Value::Bytes(b)) => Ok(Value::Bytes(concat(a, b))),
			(Self::Add, Value::List(a), Value::List(b)) => Ok(Value::List(concat(a, b))),
			(Self::Add, Value::Tuple(a), Value::Tuple(b)) => Ok(Value::Tuple(concat(a, b))),
			(Self::Mul, seq, count) | (Self::Mul, count, seq) if is_sequence(seq) && count.as_int().is_some() => {
				repeat(seq, count.as_int().unwrap_or_default())
			}
			(Self::Sub, Value::Set(a), Value::Set(b)) => Ok(Value::Set(a.iter().filter(|x| !b.iter().any(|y| y.loose_eq(x))).cloned().collect())),
			(Self::BitAnd, Value::Set(a), Value::Set(b)) => Ok(Value::Set(a.iter().filter(|x| b.iter().any(|y| y.loose_eq(x))).cloned().collect())),
			(Self::BitOr, Value::Set(a), Value::Set(b)) => Ok(Value::set(a.iter().chain(b.iter()).cloned())),
			(Self::BitXor, Value::Set(a), Value::Set(b)) => Ok(Value::Set(
				a.iter()
					.filter(|x| !b.iter().any(|y| y.loose_eq(x)))
					.chain(b.iter().filter(|y| !a.iter().any(|x| x.loose_eq(y))))
					.cloned()
					.collect(),
			)),
			_ => Err(self.type_error(left, right)),
		}
	}

	/// `bool op bool` stays boolean for the bitwise operators.
	fn apply_bool(self, left: &Value, right: &Value) -> Option<Value> {
		let (Value::Bool(a), Value::Bool(b)) = (left, right) else {
			return None;
		};
		match self {
			Self::BitAnd => Some(Value::Bool(a & b)),
			Self::BitOr => Some(Value::Bool(a | b)),
			Self::BitXor => Some(Value::Bool(a ^ b)),
			_ => None,
		}
	}

	fn apply_numbers(self, a: Number, b: Number) -> Result<Value, EvalError> {
		let overflow = EvalError::Overflow(self.symbol());
		match (a, b) {
			(Number::Int(a), Number::Int(b)) => match self {
				Self::Add => a.checked_add(b).map(Value::Int).ok_or(overflow),
				Self::Sub => a.checked_sub(b).map(Value::Int).ok_or(overflow),
				Self::Mul => a.checked_mul(b).map(Value::Int).ok_or(overflow),
				Self::Div if b == 0 => Err(EvalError::ZeroDivision),
				Self::Div => Ok(Value::Float(a as f64 / b as f64)),
				Self::FloorDiv if b == 0 => Err(EvalError::ZeroDivision),
				Self::FloorDiv => floor_div(a, b).map(Value::Int).ok_or(overflow),
				Self::Mod if b == 0 => Err(EvalError::ZeroDivision),
				Self::Mod => Ok(Value::Int(floor_mod(a, b))),
				Self::Pow if b < 0 && a == 0 => Err(EvalError::ZeroDivision),
				Self::Pow if b < 0 => Ok(Value::Float((a as f64).powf(b as f64))),
				Self::Pow => u32::try_from(b).ok().and_then(|b| a.checked_pow(b)).map(Value::Int).ok_or(overflow),
				Self::LShift | Self::RShift if b < 0 => Err(EvalError::Value("negative shift count".into())),
				Self::LShift => shift_left(a, b).map(Value::Int).ok_or(overflow),
				Self::RShift => Ok(Value::Int(if b >= 64 { if a < 0 { -1 } else { 0 } } else { a >> b })),
				Self::BitAnd => Ok(Value::Int(a & b)),
				Self::BitOr => Ok(Value::Int(a | b)),
				Self::BitXor => Ok(Value::Int(a ^ b)),
				Self::MatMul => Err(self.type_error(&Value::Int(a), &Value::Int(b))),
			},
			(a, b) => {
				let (x, y) = (a.as_f64(), b.as_f64());
				match self {
					Self::Add => Ok(Value::Float(x + y)),
					Self::Sub => Ok(Value::Float(x - y)),
					Self::Mul => Ok(Value::Float(x * y)),
					Self::Div | Self::FloorDiv | Self::Mod if y == 0.0 => Err(EvalError::ZeroDivision),
					Self::Div => Ok(Value::Float(x / y)),
					Self::FloorDiv => Ok(Value::Float((x / y).floor())),
					Self::Mod => {
						let r = x % y;
						Ok(Value::Float(if r != 0.0 && (r < 0.0) != (y < 0.0) { r + y } else { r }))
					}
					Self::Pow if x == 0.0 && y < 0.0 => Err(EvalError::ZeroDivision),
					Self::Pow => Ok(Value::Float(x.powf(y))),
					_ => Err(self.type_error(&Value::Float(x), &Value::Float(y))),
				}
			}
		}
	}

	fn type_error(self, left: &Value, right: &Value) -> EvalError {
		EvalError::Type(format!(
			"unsupported operand type(s) for {}: '{}' and '{}'",
			self.symbol(),
			left.type_name(),
			right.type_name()
		))
	}
}

fn is_sequence(value: &Value) -> bool {
	matches!(value, Value::Str(_) | Value::Bytes(_) | Value::List(_) | Value::Tuple(_))
}

fn concat<T: Clone>(a: &[T], b: &[T]) -> Arc<[T]> {
	a.iter().chain(b.iter()).cloned().collect()
}

/// Longest string, bytes, list or tuple that `*` may build.
pub const MAX_REPEAT_LEN: usize = 1 << 24;

fn repeat(seq: &Value, n: i64) -> Result<Value, EvalError> {
	let n = usize::try_from(n).unwrap_or(0);
	let check = |len: usize| match len.checked_mul(n) {
		None => Err(EvalError::Overflow("*")),
		Some(total) if total > MAX_REPEAT_LEN => Err(EvalError::Value(format!(
			"repeated sequence of length {total} exceeds the limit of {MAX_REPEAT_LEN}"
		))),
		Some(_) => Ok(()),
	};
	Ok(match seq {
		Value::Str(s) => {
			check(s.len())?;
			Value::Str(s.repeat(n).into())
		}
		Value::Bytes(b) => {
			check(b.len())?;
			Value::Bytes(b.repeat(n).into())
		}
		Value::List(items) => {
			check(items.len())?;
			Value::List(repeat_items(items, n))
		}
		Value::Tuple(items) => {
			check(items.len())?;
			Value::Tuple(repeat_items(items, n))
		}
		other => return Err(EvalError::Type(format!("can't multiply sequence of type '{}'", other.type_name()))),
	})
}

fn repeat_items(items: &Arc<[Value]>, n: usize) -> Arc<[Value]> {
	if items.is_empty() {
		return items.clone();
	}
	std::iter::repeat_n(items.iter(), n).flatten().cloned().collect()
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
	let q = a.checked_div(b)?;
	if (a % b != 0) && ((a < 0) != (b < 0)) { q.checked_sub(1) } else { Some(q) }
}

fn floor_mod(a: i64, b: i64) -> i64 {
	let r = a.wrapping_rem(b);
	if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }
}

fn shift_left(a: i64, b: i64) -> Option<i64> {
	if a == 0 {
		return Some(0);
	}
	let shift = u32::try_from(b).ok().filter(|s| *s < 64)?;
	let shifted = a << shift;
	(shifted >> shift == a).then_some(shifted)
}

/// `and` / `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
	And,
	Or,
}

impl BoolOp {
	pub fn keyword(self) -> &'static str {
		match self {
			Self::And => "and",
			Self::Or => "or",
		}
	}

	pub(crate) fn precedence(self) -> u8 {
		match self {
			Self::And => prec::AND,
			Self::Or => prec::OR,
		}
	}
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
	Not,
	Neg,
	Pos,
	Invert,
}

impl UnaryOp {
	pub const ALL: &'static [UnaryOp] = &[Self::Not, Self::Neg, Self::Pos, Self::Invert];

	pub fn symbol(self) -> &'static str {
		match self {
			Self::Not => "not ",
			Self::Neg => "-",
			Self::Pos => "+",
			Self::Invert => "~",
		}
	}

	pub(crate) fn precedence(self) -> u8 {
		match self {
			Self::Not => prec::NOT,
			_ => prec::FACTOR,
		}
	}

	/// Applies the operator.
	///
	/// # Errors
	///
	/// Type mismatches and negation overflow.
	pub fn apply(self, operand: &Value) -> Result<Value, EvalError> {
		match (self, operand) {
			(Self::Not, v) => Ok(Value::Bool(!v.is_truthy())),
			(Self::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
			(Self::Neg, v) if v.as_int().is_some() => v
				.as_int()
				.and_then(i64::checked_neg)
				.map(Value::Int)
				.ok_or(EvalError::Overflow("-")),
			(Self::Pos, Value::Float(f)) => Ok(Value::Float(*f)),
			(Self::Pos, v) if v.as_int().is_some() => Ok(Value::Int(v.as_int().unwrap_or_default())),
			(Self::Invert, v) if v.as_int().is_some() => Ok(Value::Int(!v.as_int().unwrap_or_default())),
			(op, v) => Err(EvalError::Type(format!(
				"bad operand type for unary {}: '{}'",
				op.symbol().trim(),
				v.type_name()
			))),
		}
	}
}

/// Comparison operators; chains like `a < b < c` hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
	Eq,
	NotEq,
	Lt,
	LtE,
	Gt,
	GtE,
	In,
	NotIn,
}

impl CmpOp {
	pub const ALL: &'static [CmpOp] = &[
		Self::Eq,
		Self::NotEq,
		Self::Lt,
		Self::LtE,
		Self::Gt,
		Self::GtE,
		Self::In,
		Self::NotIn,
	];

	pub fn symbol(self) -> &'static str {
		match self {
			Self::Eq => "==",
			Self::NotEq => "!=",
			Self::Lt => "<",
			Self::LtE => "<=",
			Self::Gt => ">",
			Self::GtE => ">=",
			Self::In => "in",
			Self::NotIn => "not in",
		}
	}

	/// Evaluates one link of a comparison chain.
	///
	/// # Errors
	///
	/// Unorderable or non-container operands.
	pub fn apply(self, left: &Value, right: &Value) -> Result<bool, EvalError> {
		use std::cmp::Ordering::*;

		Ok(match self {
			Self::Eq => left.loose_eq(right),
			Self::NotEq => !left.loose_eq(right),
			Self::Lt => matches!(left.loose_cmp(right, "<")?, Some(Less)),
			Self::LtE => matches!(left.loose_cmp(right, "<=")?, Some(Less | Equal)),
			Self::Gt => matches!(left.loose_cmp(right, ">")?, Some(Greater)),
			Self::GtE => matches!(left.loose_cmp(right, ">=")?, Some(Greater | Equal)),
			Self::In => right.contains(left)?,
			Self::NotIn => !right.contains(left)?,
		})
	}
}
