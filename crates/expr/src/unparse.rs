//! Canonical text form of an [`Expr`].
//!
//! Parentheses are emitted only where precedence requires them, so the output
//! of a parsed canonical string reproduces that string, and parsing the output
//! of any tree reproduces the tree. Names are written verbatim and must be
//! identifiers; NaN constants print as `nan`, which reads back as a name.

use std::fmt::{self, Write as _};

use crate::ops::prec;
use crate::value::{write_bytes_literal, write_float, write_str_literal};
use crate::{Constant, Expr, ExprKind, UnaryOp};

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_expr(f, self, prec::TEST)
	}
}

impl fmt::Display for Constant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => f.write_str("None"),
			Self::Bool(true) => f.write_str("True"),
			Self::Bool(false) => f.write_str("False"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Float(v) => write_float(f, *v),
			Self::Str(s) => write_str_literal(f, s),
			Self::Bytes(b) => write_bytes_literal(f, b),
		}
	}
}

fn precedence(expr: &Expr) -> u8 {
	match expr.kind() {
		ExprKind::Constant(c) if c.is_negative_number() => prec::FACTOR,
		ExprKind::Name(_) | ExprKind::Constant(_) | ExprKind::Tuple(_) | ExprKind::List(_) | ExprKind::Set(_) => prec::ATOM,
		ExprKind::Compare { .. } => prec::CMP,
		ExprKind::BinOp { op, .. } => op.precedence(),
		ExprKind::BoolOp { op, .. } => op.precedence(),
		ExprKind::UnaryOp { op, .. } => op.precedence(),
		ExprKind::IfExp { .. } => prec::TEST,
	}
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, context: u8) -> fmt::Result {
	let wrap = precedence(expr) < context;
	if wrap {
		f.write_char('(')?;
	}
	write_node(f, expr)?;
	if wrap {
		f.write_char(')')?;
	}
	Ok(())
}

fn write_node(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
	match expr.kind() {
		ExprKind::Name(id) => f.write_str(id),
		ExprKind::Constant(c) => write!(f, "{c}"),
		ExprKind::Compare { left, ops, comparators } => {
			write_expr(f, left, prec::CMP + 1)?;
			for (op, right) in ops.iter().zip(comparators) {
				write!(f, " {} ", op.symbol())?;
				write_expr(f, right, prec::CMP + 1)?;
			}
			Ok(())
		}
		ExprKind::BinOp { left, op, right } => {
			let p = op.precedence();
			// `**` is right-associative and binds tighter than a unary prefix on its left.
			let (left_ctx, right_ctx) = if p == prec::POWER { (prec::ATOM, prec::FACTOR) } else { (p, p + 1) };
			write_expr(f, left, left_ctx)?;
			write!(f, " {} ", op.symbol())?;
			write_expr(f, right, right_ctx)
		}
		ExprKind::BoolOp { op, values } => {
			for (idx, value) in values.iter().enumerate() {
				if idx > 0 {
					write!(f, " {} ", op.keyword())?;
				}
				write_expr(f, value, op.precedence() + 1)?;
			}
			Ok(())
		}
		ExprKind::UnaryOp { op, operand } => {
			f.write_str(op.symbol())?;
			match (op, operand.kind()) {
				// A bare literal after `-` would read back as one negative constant.
				(UnaryOp::Neg, ExprKind::Constant(c)) if c.is_number() => {
					f.write_char('(')?;
					write_node(f, operand)?;
					f.write_char(')')
				}
				_ => write_expr(f, operand, op.precedence()),
			}
		}
		ExprKind::IfExp { test, body, orelse } => {
			write_expr(f, body, prec::OR)?;
			f.write_str(" if ")?;
			write_expr(f, test, prec::OR)?;
			f.write_str(" else ")?;
			write_expr(f, orelse, prec::TEST)
		}
		ExprKind::Tuple(elements) => {
			f.write_char('(')?;
			write_elements(f, elements)?;
			if elements.len() == 1 {
				f.write_char(',')?;
			}
			f.write_char(')')
		}
		ExprKind::List(elements) => {
			f.write_char('[')?;
			write_elements(f, elements)?;
			f.write_char(']')
		}
		ExprKind::Set(elements) if elements.is_empty() => f.write_str("set()"),
		ExprKind::Set(elements) => {
			f.write_char('{')?;
			write_elements(f, elements)?;
			f.write_char('}')
		}
	}
}

fn write_elements(f: &mut fmt::Formatter<'_>, elements: &[Expr]) -> fmt::Result {
	for (idx, element) in elements.iter().enumerate() {
		if idx > 0 {
			f.write_str(", ")?;
		}
		write_expr(f, element, prec::TEST)?;
	}
	Ok(())
}
