use actuate_expr::Value;
use indexmap::IndexMap;

use crate::CommandError;

/// Arguments passed to a command callback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandArgs {
	pub positional: Vec<Value>,
	pub keyword: IndexMap<String, Value>,
}

impl CommandArgs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.keyword.insert(name.into(), value.into());
		self
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.keyword.get(name)
	}

	pub fn positional(&self, index: usize) -> Option<&Value> {
		self.positional.get(index)
	}

	/// The keyword argument `name`.
	///
	/// # Errors
	///
	/// [`CommandError::MissingArgument`] if it was not supplied.
	pub fn require(&self, name: &str) -> Result<&Value, CommandError> {
		self.get(name).ok_or_else(|| CommandError::MissingArgument(name.to_owned()))
	}

	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}
}
