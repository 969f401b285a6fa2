//! Declared context keys.

use std::sync::Arc;

use actuate_expr::{Expr, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{Context, ContextError};

/// A named context variable with a default value and a description.
///
/// Keys convert into [`Expr::name`] references, so guards can be composed
/// from declarations rather than string literals:
///
/// ```
/// use actuate_context::ContextKey;
/// use actuate_expr::Expr;
///
/// let focused = ContextKey::new("editor_focused", false, "An editor has keyboard focus");
/// let when = focused.expr() & !Expr::name("read_only");
/// assert_eq!(when.to_string(), "editor_focused and not read_only");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContextKey {
	name: Arc<str>,
	default: Value,
	description: Arc<str>,
}

impl ContextKey {
	pub fn new(name: impl Into<Arc<str>>, default: impl Into<Value>, description: impl Into<Arc<str>>) -> Self {
		Self {
			name: name.into(),
			default: default.into(),
			description: description.into(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn default_value(&self) -> &Value {
		&self.default
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn expr(&self) -> Expr {
		Expr::name(self.name.clone())
	}

	/// The key's value in `context`, or its default.
	pub fn get(&self, context: &Context) -> Value {
		context.get(&self.name).unwrap_or_else(|| self.default.clone())
	}

	pub fn set(&self, context: &Context, value: impl Into<Value>) -> Option<Value> {
		context.set(&*self.name, value)
	}
}

impl From<&ContextKey> for Expr {
	fn from(key: &ContextKey) -> Self {
		key.expr()
	}
}

impl From<ContextKey> for Expr {
	fn from(key: ContextKey) -> Self {
		key.expr()
	}
}

/// Declarations collected for introspection and for seeding contexts.
#[derive(Debug, Default)]
pub struct ContextKeyCatalog {
	keys: RwLock<IndexMap<Arc<str>, ContextKey>>,
}

impl ContextKeyCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a key. Re-declaring an identical key returns it again.
	///
	/// # Errors
	///
	/// [`ContextError::DuplicateKey`] when the name is already declared with
	/// a different default or description.
	pub fn declare(&self, key: ContextKey) -> Result<ContextKey, ContextError> {
		let mut keys = self.keys.write();
		if let Some(existing) = keys.get(&key.name) {
			if *existing == key {
				return Ok(key);
			}
			return Err(ContextError::DuplicateKey(key.name.to_string()));
		}
		tracing::debug!(key = %key.name, "declared context key");
		keys.insert(key.name.clone(), key.clone());
		Ok(key)
	}

	pub fn get(&self, name: &str) -> Option<ContextKey> {
		self.keys.read().get(name).cloned()
	}

	/// Declarations in declaration order.
	pub fn keys(&self) -> Vec<ContextKey> {
		self.keys.read().values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.keys.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.read().is_empty()
	}

	/// Stores every declared default in `context` that it does not already
	/// hold in its own layer, as one change event.
	pub fn seed(&self, context: &Context) {
		let keys = self.keys();
		context.buffered(|ctx| {
			for key in keys.iter().filter(|key| !ctx.contains_own(key.name())) {
				ctx.set(key.name(), key.default_value().clone());
			}
		});
	}
}
