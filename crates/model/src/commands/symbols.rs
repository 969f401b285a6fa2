//! Named callables that string callback references resolve against.

use std::fmt;
use std::sync::Arc;

use actuate_expr::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{CommandArgs, CommandError, CommandFn, ResolutionError};

#[derive(Clone)]
enum Symbol {
	Callable(CommandFn),
	Value(Value),
}

type Modules = FxHashMap<String, FxHashMap<String, Symbol>>;

/// Modules of named symbols, addressed as `"module.path:symbol"`.
///
/// Clones share the table.
#[derive(Clone, Default)]
pub struct SymbolTable {
	modules: Arc<RwLock<Modules>>,
}

impl SymbolTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines a callable symbol, replacing any previous definition.
	///
	/// # Errors
	///
	/// [`ResolutionError::Malformed`] if `path` is not `"module:symbol"`.
	pub fn define(
		&self,
		path: &str,
		f: impl Fn(CommandArgs) -> Result<Value, CommandError> + Send + Sync + 'static,
	) -> Result<(), ResolutionError> {
		self.insert(path, Symbol::Callable(Arc::new(f)))
	}

	/// Defines a plain value. References to it resolve to
	/// [`ResolutionError::NotCallable`].
	///
	/// # Errors
	///
	/// [`ResolutionError::Malformed`] if `path` is not `"module:symbol"`.
	pub fn define_value(&self, path: &str, value: impl Into<Value>) -> Result<(), ResolutionError> {
		self.insert(path, Symbol::Value(value.into()))
	}

	fn insert(&self, path: &str, symbol: Symbol) -> Result<(), ResolutionError> {
		let (module, name) = split_reference(path)?;
		self.modules
			.write()
			.entry(module.to_owned())
			.or_default()
			.insert(name.to_owned(), symbol);
		Ok(())
	}

	/// Looks up `reference`.
	///
	/// # Errors
	///
	/// A [`ResolutionError`] describing which part of the reference failed.
	pub fn resolve(&self, reference: &str) -> Result<CommandFn, ResolutionError> {
		let (module, name) = split_reference(reference)?;
		let modules = self.modules.read();
		let symbols = modules.get(module).ok_or_else(|| ResolutionError::UnknownModule {
			reference: reference.to_owned(),
			module: module.to_owned(),
		})?;
		match symbols.get(name) {
			Some(Symbol::Callable(f)) => Ok(f.clone()),
			Some(Symbol::Value(_)) => Err(ResolutionError::NotCallable(reference.to_owned())),
			None => Err(ResolutionError::UnknownSymbol {
				reference: reference.to_owned(),
				symbol: name.to_owned(),
			}),
		}
	}
}

impl fmt::Debug for SymbolTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let modules = self.modules.read();
		let mut names: Vec<&str> = modules.keys().map(String::as_str).collect();
		names.sort_unstable();
		f.debug_struct("SymbolTable").field("modules", &names).finish()
	}
}

fn split_reference(reference: &str) -> Result<(&str, &str), ResolutionError> {
	let malformed = || ResolutionError::Malformed(reference.to_owned());
	let (module, name) = reference.split_once(':').ok_or_else(malformed)?;
	let module_ok = !module.is_empty() && module.split('.').all(is_identifier);
	if !module_ok || !is_identifier(name) {
		return Err(malformed());
	}
	Ok((module, name))
}

fn is_identifier(part: &str) -> bool {
	let mut chars = part.chars();
	chars.next().is_some_and(|c| c == '_' || c.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric())
}
