//! Evaluation entry points.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::namespace::{Layered, Namespace};
use crate::parser::parse_source;
use crate::{EvalError, Expr, ExprError, ParseError, Value};

impl Expr {
	/// Evaluates the expression against `namespace`.
	///
	/// # Errors
	///
	/// [`EvalError::Name`] lists every referenced name absent from the
	/// namespace, not only the first one hit. Operator failures surface as the
	/// other [`EvalError`] variants.
	pub fn eval(&self, namespace: &dyn Namespace) -> Result<Value, EvalError> {
		(self.compiled())(namespace).map_err(|err| match err {
			EvalError::Name { .. } => self.missing_names(namespace),
			other => other,
		})
	}

	/// Evaluates with `overrides` layered over `namespace`; overrides win.
	///
	/// # Errors
	///
	/// As [`Expr::eval`].
	pub fn eval_with(&self, namespace: &dyn Namespace, overrides: &[(&str, Value)]) -> Result<Value, EvalError> {
		self.eval(&Layered {
			overrides,
			base: namespace,
		})
	}

	fn missing_names(&self, namespace: &dyn Namespace) -> EvalError {
		let missing = self
			.names()
			.iter()
			.filter(|name| !namespace.contains(name))
			.map(|name| name.to_string())
			.collect();
		EvalError::Name { missing }
	}
}

/// Types accepted wherever expression text or an already built [`Expr`] may
/// be passed.
pub trait IntoExpr {
	/// # Errors
	///
	/// Text that does not parse.
	fn into_expr(self) -> Result<Expr, ParseError>;
}

impl IntoExpr for Expr {
	fn into_expr(self) -> Result<Expr, ParseError> {
		Ok(self)
	}
}

impl IntoExpr for &Expr {
	fn into_expr(self) -> Result<Expr, ParseError> {
		Ok(self.clone())
	}
}

impl IntoExpr for &str {
	fn into_expr(self) -> Result<Expr, ParseError> {
		parse_source(self)
	}
}

impl IntoExpr for String {
	fn into_expr(self) -> Result<Expr, ParseError> {
		parse_source(&self)
	}
}

impl IntoExpr for &String {
	fn into_expr(self) -> Result<Expr, ParseError> {
		parse_source(self)
	}
}

/// Parses `source`; an [`Expr`] is returned as is.
///
/// # Errors
///
/// [`ParseError`] for malformed or unsupported text.
pub fn parse(source: impl IntoExpr) -> Result<Expr, ParseError> {
	source.into_expr().inspect_err(|err| {
		tracing::debug!(position = err.position, node = err.node, error = %err, "rejected expression");
	})
}

impl FromStr for Expr {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}

impl Serialize for Expr {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Expr {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		parse(text).map_err(serde::de::Error::custom)
	}
}

/// A guard as authored: a literal flag, a built expression or source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	Literal(bool),
	Expr(Expr),
	Source(String),
}

impl From<bool> for Condition {
	fn from(b: bool) -> Self {
		Self::Literal(b)
	}
}

impl From<Expr> for Condition {
	fn from(expr: Expr) -> Self {
		Self::Expr(expr)
	}
}

impl From<&Expr> for Condition {
	fn from(expr: &Expr) -> Self {
		Self::Expr(expr.clone())
	}
}

impl From<&str> for Condition {
	fn from(source: &str) -> Self {
		Self::Source(source.to_owned())
	}
}

impl From<String> for Condition {
	fn from(source: String) -> Self {
		Self::Source(source)
	}
}

/// Evaluates a guard. Literal booleans pass through without touching the
/// namespace; anything else is parsed, then evaluated.
///
/// # Errors
///
/// [`ExprError::Syntax`] for unparsable text, [`ExprError::Eval`] for
/// evaluation failures.
pub fn safe_eval(condition: impl Into<Condition>, namespace: &dyn Namespace) -> Result<Value, ExprError> {
	match condition.into() {
		Condition::Literal(b) => Ok(Value::Bool(b)),
		Condition::Expr(expr) => Ok(expr.eval(namespace)?),
		Condition::Source(source) => Ok(parse(source)?.eval(namespace)?),
	}
}
