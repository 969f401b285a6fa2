//! Immutable expression trees.
//!
//! Every [`Expr`] node is built once, bottom-up, and at that point records the
//! set of free variable names it references and a compiled evaluation closure
//! composed from its children's closures. Equality and hashing only look at the
//! tree shape ([`ExprKind`]).

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::namespace::Namespace;
use crate::value::hash_float;
use crate::{BinaryOp, BoolOp, CmpOp, EvalError, UnaryOp, Value};

#[cfg(test)]
mod tests;

/// A literal scalar.
///
/// Equality is strict and floats compare by bit pattern, so a constant equals
/// exactly the constant it was serialized from.
#[derive(Debug, Clone)]
pub enum Constant {
	None,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(Arc<str>),
	Bytes(Arc<[u8]>),
}

impl Constant {
	pub fn value(&self) -> Value {
		match self {
			Self::None => Value::None,
			Self::Bool(b) => Value::Bool(*b),
			Self::Int(i) => Value::Int(*i),
			Self::Float(f) => Value::Float(*f),
			Self::Str(s) => Value::Str(s.clone()),
			Self::Bytes(b) => Value::Bytes(b.clone()),
		}
	}

	/// True for numeric constants whose text form starts with `-`.
	pub(crate) fn is_negative_number(&self) -> bool {
		match self {
			Self::Int(i) => *i < 0,
			Self::Float(f) => f.is_sign_negative() && !f.is_nan(),
			_ => false,
		}
	}

	pub(crate) fn is_number(&self) -> bool {
		matches!(self, Self::Int(_) | Self::Float(_))
	}
}

impl PartialEq for Constant {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::None, Self::None) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::Bytes(a), Self::Bytes(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Constant {}

impl Hash for Constant {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Self::None => {}
			Self::Bool(b) => b.hash(state),
			Self::Int(i) => i.hash(state),
			Self::Float(f) => hash_float(*f, state),
			Self::Str(s) => s.hash(state),
			Self::Bytes(b) => b.hash(state),
		}
	}
}

impl From<bool> for Constant {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Constant {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<i32> for Constant {
	fn from(i: i32) -> Self {
		Self::Int(i64::from(i))
	}
}

impl From<f64> for Constant {
	fn from(f: f64) -> Self {
		Self::Float(f)
	}
}

impl From<&str> for Constant {
	fn from(s: &str) -> Self {
		Self::Str(s.into())
	}
}

impl From<String> for Constant {
	fn from(s: String) -> Self {
		Self::Str(s.into())
	}
}

impl From<&[u8]> for Constant {
	fn from(b: &[u8]) -> Self {
		Self::Bytes(b.into())
	}
}

impl<T: Into<Constant>> From<Option<T>> for Constant {
	fn from(v: Option<T>) -> Self {
		v.map_or(Self::None, Into::into)
	}
}

/// The shape of one expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
	Name(Arc<str>),
	Constant(Constant),
	/// `left ops[0] comparators[0] ops[1] comparators[1] ...`
	Compare {
		left: Expr,
		ops: Vec<CmpOp>,
		comparators: Vec<Expr>,
	},
	BinOp {
		left: Expr,
		op: BinaryOp,
		right: Expr,
	},
	/// Two or more operands joined by the same boolean operator.
	BoolOp {
		op: BoolOp,
		values: Vec<Expr>,
	},
	UnaryOp {
		op: UnaryOp,
		operand: Expr,
	},
	/// `body if test else orelse`
	IfExp {
		test: Expr,
		body: Expr,
		orelse: Expr,
	},
	Tuple(Vec<Expr>),
	List(Vec<Expr>),
	Set(Vec<Expr>),
}

impl ExprKind {
	/// Node kind name, as reported in diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Name(_) => "Name",
			Self::Constant(_) => "Constant",
			Self::Compare { .. } => "Compare",
			Self::BinOp { .. } => "BinOp",
			Self::BoolOp { .. } => "BoolOp",
			Self::UnaryOp { .. } => "UnaryOp",
			Self::IfExp { .. } => "IfExp",
			Self::Tuple(_) => "Tuple",
			Self::List(_) => "List",
			Self::Set(_) => "Set",
		}
	}
}

pub(crate) type Compiled = Arc<dyn Fn(&dyn Namespace) -> Result<Value, EvalError> + Send + Sync>;

struct Node {
	kind: ExprKind,
	names: BTreeSet<Arc<str>>,
	depth: usize,
	compiled: Compiled,
}

/// A parsed or constructed condition expression.
///
/// Cheap to clone; the tree is shared and never mutated.
#[derive(Clone)]
pub struct Expr(Arc<Node>);

impl Expr {
	fn from_kind(kind: ExprKind) -> Self {
		let children = children(&kind);
		let names = match &kind {
			ExprKind::Name(id) => BTreeSet::from([id.clone()]),
			_ => children.iter().flat_map(|child| child.names().iter().cloned()).collect(),
		};
		let depth = 1 + children.iter().map(|child| child.depth()).max().unwrap_or(0);
		let compiled = compile(&kind);
		Self(Arc::new(Node {
			kind,
			names,
			depth,
			compiled,
		}))
	}

	pub fn kind(&self) -> &ExprKind {
		&self.0.kind
	}

	/// Free variable names referenced anywhere in the tree, sorted.
	pub fn names(&self) -> &BTreeSet<Arc<str>> {
		&self.0.names
	}

	/// Node count on the longest path from this node to a leaf.
	pub fn depth(&self) -> usize {
		self.0.depth
	}

	pub(crate) fn compiled(&self) -> &Compiled {
		&self.0.compiled
	}

	/// A variable reference.
	pub fn name(id: impl Into<Arc<str>>) -> Self {
		Self::from_kind(ExprKind::Name(id.into()))
	}

	pub fn constant(value: impl Into<Constant>) -> Self {
		Self::from_kind(ExprKind::Constant(value.into()))
	}

	pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
		Self::from_kind(ExprKind::BinOp { left, op, right })
	}

	pub fn unary(op: UnaryOp, operand: Expr) -> Self {
		Self::from_kind(ExprKind::UnaryOp { op, operand })
	}

	/// Joins `values` with one boolean operator.
	///
	/// A single value is returned unchanged; an empty list yields the
	/// operator's identity (`True` for `and`, `False` for `or`).
	pub fn bool_op(op: BoolOp, values: impl IntoIterator<Item = Expr>) -> Self {
		let mut values: Vec<Expr> = values.into_iter().collect();
		match values.len() {
			0 => Self::constant(op == BoolOp::And),
			1 => values.remove(0),
			_ => Self::from_kind(ExprKind::BoolOp { op, values }),
		}
	}

	/// Builds a comparison chain. With no links, `left` is returned unchanged.
	pub fn compare(left: Expr, links: impl IntoIterator<Item = (CmpOp, Expr)>) -> Self {
		let (ops, comparators): (Vec<_>, Vec<_>) = links.into_iter().unzip();
		if ops.is_empty() {
			return left;
		}
		Self::from_kind(ExprKind::Compare { left, ops, comparators })
	}

	/// `body if test else orelse`
	pub fn if_else(test: Expr, body: Expr, orelse: Expr) -> Self {
		Self::from_kind(ExprKind::IfExp { test, body, orelse })
	}

	pub fn tuple(elements: impl IntoIterator<Item = Expr>) -> Self {
		Self::from_kind(ExprKind::Tuple(elements.into_iter().collect()))
	}

	pub fn list(elements: impl IntoIterator<Item = Expr>) -> Self {
		Self::from_kind(ExprKind::List(elements.into_iter().collect()))
	}

	pub fn set(elements: impl IntoIterator<Item = Expr>) -> Self {
		Self::from_kind(ExprKind::Set(elements.into_iter().collect()))
	}
}

impl PartialEq for Expr {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0) || self.0.kind == other.0.kind
	}
}

impl Eq for Expr {}

impl Hash for Expr {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.kind.hash(state);
	}
}

impl fmt::Debug for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Expr({self})")
	}
}

fn children(kind: &ExprKind) -> Vec<&Expr> {
	match kind {
		ExprKind::Name(_) | ExprKind::Constant(_) => Vec::new(),
		ExprKind::Compare { left, comparators, .. } => std::iter::once(left).chain(comparators).collect(),
		ExprKind::BinOp { left, right, .. } => vec![left, right],
		ExprKind::BoolOp { values, .. } => values.iter().collect(),
		ExprKind::UnaryOp { operand, .. } => vec![operand],
		ExprKind::IfExp { test, body, orelse } => vec![test, body, orelse],
		ExprKind::Tuple(elements) | ExprKind::List(elements) | ExprKind::Set(elements) => elements.iter().collect(),
	}
}

fn compile(kind: &ExprKind) -> Compiled {
	match kind {
		ExprKind::Name(id) => {
			let id = id.clone();
			Arc::new(move |ns: &dyn Namespace| {
				ns.lookup(&id).ok_or_else(|| EvalError::Name {
					missing: vec![id.to_string()],
				})
			})
		}
		ExprKind::Constant(constant) => {
			let value = constant.value();
			Arc::new(move |_: &dyn Namespace| Ok(value.clone()))
		}
		ExprKind::Compare { left, ops, comparators } => {
			let left = left.compiled().clone();
			let links: Vec<(CmpOp, Compiled)> = ops
				.iter()
				.copied()
				.zip(comparators.iter().map(|c| c.compiled().clone()))
				.collect();
			Arc::new(move |ns: &dyn Namespace| {
				let mut lhs = left(ns)?;
				for (op, rhs) in &links {
					let rhs = rhs(ns)?;
					if !op.apply(&lhs, &rhs)? {
						return Ok(Value::Bool(false));
					}
					lhs = rhs;
				}
				Ok(Value::Bool(true))
			})
		}
		ExprKind::BinOp { left, op, right } => {
			let (left, op, right) = (left.compiled().clone(), *op, right.compiled().clone());
			Arc::new(move |ns: &dyn Namespace| op.apply(&left(ns)?, &right(ns)?))
		}
		ExprKind::BoolOp { op, values } => {
			let op = *op;
			let values: Vec<Compiled> = values.iter().map(|v| v.compiled().clone()).collect();
			Arc::new(move |ns: &dyn Namespace| {
				let mut last = Value::None;
				for value in &values {
					last = value(ns)?;
					let truthy = last.is_truthy();
					if (op == BoolOp::And && !truthy) || (op == BoolOp::Or && truthy) {
						break;
					}
				}
				Ok(last)
			})
		}
		ExprKind::UnaryOp { op, operand } => {
			let (op, operand) = (*op, operand.compiled().clone());
			Arc::new(move |ns: &dyn Namespace| op.apply(&operand(ns)?))
		}
		ExprKind::IfExp { test, body, orelse } => {
			let (test, body, orelse) = (test.compiled().clone(), body.compiled().clone(), orelse.compiled().clone());
			Arc::new(move |ns: &dyn Namespace| if test(ns)?.is_truthy() { body(ns) } else { orelse(ns) })
		}
		ExprKind::Tuple(elements) => compile_elements(elements, Value::Tuple),
		ExprKind::List(elements) => compile_elements(elements, Value::List),
		ExprKind::Set(elements) => compile_elements(elements, |items: Arc<[Value]>| Value::set(items.iter().cloned())),
	}
}

fn compile_elements(elements: &[Expr], build: impl Fn(Arc<[Value]>) -> Value + Send + Sync + 'static) -> Compiled {
	let elements: Vec<Compiled> = elements.iter().map(|e| e.compiled().clone()).collect();
	Arc::new(move |ns: &dyn Namespace| {
		let items = elements.iter().map(|e| e(ns)).collect::<Result<Arc<[Value]>, _>>()?;
		Ok(build(items))
	})
}
