//! Composing expressions in code.
//!
//! `&`, `|` and `!` build *logical* `and`, `or` and `not`, since guard
//! expressions are combined far more often than integers are masked. The
//! bitwise operators are available as [`Expr::bit_and`], [`Expr::bit_or`] and
//! [`Expr::bit_xor`].
//!
//! ```
//! use actuate_expr::Expr;
//!
//! let when = Expr::name("editor_focused") & Expr::name("line_count").greater(0);
//! assert_eq!(when.to_string(), "editor_focused and line_count > 0");
//! ```

use std::ops;

use crate::{BinaryOp, BoolOp, CmpOp, Constant, Expr, ExprKind, UnaryOp};

macro_rules! constant_into_expr {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Expr {
				fn from(value: $ty) -> Self {
					Expr::constant(value)
				}
			}
		)*
	};
}

constant_into_expr!(Constant, bool, i64, i32, f64, &str, String);

impl From<&Expr> for Expr {
	fn from(expr: &Expr) -> Self {
		expr.clone()
	}
}

impl Expr {
	fn compare_with(self, op: CmpOp, other: impl Into<Expr>) -> Self {
		Self::compare(self, [(op, other.into())])
	}

	pub fn equals(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::Eq, other)
	}

	pub fn not_equals(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::NotEq, other)
	}

	pub fn less(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::Lt, other)
	}

	pub fn less_eq(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::LtE, other)
	}

	pub fn greater(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::Gt, other)
	}

	pub fn greater_eq(self, other: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::GtE, other)
	}

	/// `self in container`
	pub fn contained_in(self, container: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::In, container)
	}

	/// `self not in container`
	pub fn not_contained_in(self, container: impl Into<Expr>) -> Self {
		self.compare_with(CmpOp::NotIn, container)
	}

	pub fn bit_and(self, other: impl Into<Expr>) -> Self {
		Self::binary(self, BinaryOp::BitAnd, other.into())
	}

	pub fn bit_or(self, other: impl Into<Expr>) -> Self {
		Self::binary(self, BinaryOp::BitOr, other.into())
	}

	pub fn bit_xor(self, other: impl Into<Expr>) -> Self {
		Self::binary(self, BinaryOp::BitXor, other.into())
	}

	/// Logical negation, `not operand`.
	pub fn not(operand: impl Into<Expr>) -> Self {
		Self::unary(UnaryOp::Not, operand.into())
	}

	/// Appends to a left-hand chain of the same operator, matching how
	/// `a and b and c` parses.
	fn extend_bool(self, op: BoolOp, other: Expr) -> Self {
		let chain = match self.kind() {
			ExprKind::BoolOp { op: existing, values } if *existing == op => Some(values.clone()),
			_ => None,
		};
		match chain {
			Some(mut values) => {
				values.push(other);
				Self::bool_op(op, values)
			}
			None => Self::bool_op(op, [self, other]),
		}
	}
}

impl<T: Into<Expr>> ops::BitAnd<T> for Expr {
	type Output = Expr;

	fn bitand(self, rhs: T) -> Expr {
		self.extend_bool(BoolOp::And, rhs.into())
	}
}

impl<T: Into<Expr>> ops::BitOr<T> for Expr {
	type Output = Expr;

	fn bitor(self, rhs: T) -> Expr {
		self.extend_bool(BoolOp::Or, rhs.into())
	}
}

impl ops::Not for Expr {
	type Output = Expr;

	fn not(self) -> Expr {
		Expr::unary(UnaryOp::Not, self)
	}
}

impl ops::Neg for Expr {
	type Output = Expr;

	fn neg(self) -> Expr {
		Expr::unary(UnaryOp::Neg, self)
	}
}

macro_rules! arithmetic {
	($($trait:ident $method:ident => $op:ident),* $(,)?) => {
		$(
			impl<T: Into<Expr>> ops::$trait<T> for Expr {
				type Output = Expr;

				fn $method(self, rhs: T) -> Expr {
					Expr::binary(self, BinaryOp::$op, rhs.into())
				}
			}
		)*
	};
}

arithmetic! {
	Add add => Add,
	Sub sub => Sub,
	Mul mul => Mul,
	Div div => Div,
	Rem rem => Mod,
}
