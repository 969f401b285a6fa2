use thiserror::Error;

/// The expression text could not be parsed, or used a construct outside the
/// supported subset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at position {position})")]
pub struct ParseError {
	/// Human-readable description of the failure.
	pub message: String,
	/// Byte offset in the source where the failure was detected.
	pub position: usize,
	/// Kind of the offending node when a recognised but unsupported construct
	/// was found (`"Call"`, `"Attribute"`, `"Subscript"` ...).
	pub node: Option<&'static str>,
}

impl ParseError {
	pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
		Self {
			message: message.into(),
			position,
			node: None,
		}
	}

	pub(crate) fn unsupported(node: &'static str, position: usize) -> Self {
		Self {
			message: format!("unsupported expression node '{node}'"),
			position,
			node: Some(node),
		}
	}
}

/// Failures raised while evaluating a parsed expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
	/// Variables referenced by the expression are absent from the namespace.
	#[error("names not found in context: {}", .missing.join(", "))]
	Name {
		/// Every referenced-but-absent name, sorted.
		missing: Vec<String>,
	},
	/// An operator was applied to operands of unsupported types.
	#[error("type error: {0}")]
	Type(String),
	/// An operand had the right type but an invalid value.
	#[error("value error: {0}")]
	Value(String),
	#[error("division by zero")]
	ZeroDivision,
	#[error("integer overflow in '{0}'")]
	Overflow(&'static str),
}

/// Either phase of turning text into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
	#[error("syntax error: {0}")]
	Syntax(#[from] ParseError),
	#[error(transparent)]
	Eval(#[from] EvalError),
}

pub type Result<T, E = ExprError> = std::result::Result<T, E>;
