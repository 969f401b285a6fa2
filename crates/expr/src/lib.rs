//! Restricted condition expressions.
//!
//! Text such as `editor_focused and not read_only` is parsed into an
//! immutable [`Expr`] tree that knows the variable names it references and
//! carries a compiled evaluation closure. Trees serialize back to canonical
//! text with [`Display`](std::fmt::Display), and `parse(e.to_string()) == e`.
//!
//! Only names, literals, operators, the conditional expression and literal
//! tuples, lists and sets are accepted. Calls, attribute access, subscripts,
//! comprehensions, lambdas and assignments fail at parse time with a
//! [`ParseError`] naming the rejected construct.

mod ast;
mod builder;
mod error;
mod eval;
mod lexer;
mod namespace;
mod ops;
mod parser;
mod unparse;
mod value;

pub use ast::{Constant, Expr, ExprKind};
pub use error::{EvalError, ExprError, ParseError, Result};
pub use eval::{Condition, IntoExpr, parse, safe_eval};
pub use namespace::{Empty, Layered, Namespace};
pub use ops::{BinaryOp, BoolOp, CmpOp, MAX_REPEAT_LEN, UnaryOp};
pub use parser::{MAX_NESTING, MAX_TREE_DEPTH};
pub use value::Value;
