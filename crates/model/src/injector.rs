//! Argument injection for command callbacks.
//!
//! [`CommandsRegistry::execute`](crate::CommandsRegistry::execute) hands the
//! resolved callable and the caller's arguments to an [`Injector`], which
//! returns a ready-to-run invocation.

use std::fmt;
use std::sync::Arc;

use actuate_context::Context;
use actuate_expr::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{CommandArgs, CommandError, CommandFn};

pub type Invocation = Box<dyn FnOnce() -> Result<Value, CommandError> + Send>;

/// Binds arguments to a command callable.
pub trait Injector: Send + Sync {
	fn inject(&self, command_id: &str, callable: CommandFn, args: CommandArgs) -> Invocation;
}

/// Calls the callable with exactly the arguments given.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Injector for Passthrough {
	fn inject(&self, _command_id: &str, callable: CommandFn, args: CommandArgs) -> Invocation {
		Box::new(move || callable(args))
	}
}

type Provider = Arc<dyn Fn() -> Option<Value> + Send + Sync>;

/// Fills keyword arguments the caller left out from named providers.
///
/// Providers run when the invocation runs, on whichever thread executes the
/// command. A provider returning `None` leaves the argument absent.
#[derive(Clone, Default)]
pub struct ProviderStore {
	providers: Arc<RwLock<IndexMap<String, Provider>>>,
}

impl ProviderStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn provide(&self, name: impl Into<String>, provider: impl Fn() -> Option<Value> + Send + Sync + 'static) {
		self.providers.write().insert(name.into(), Arc::new(provider));
	}

	pub fn provide_value(&self, name: impl Into<String>, value: impl Into<Value>) {
		let value = value.into();
		self.provide(name, move || Some(value.clone()));
	}

	/// Provides `name` from the current value of the same key in `context`.
	pub fn provide_from_context(&self, name: impl Into<String>, context: Context) {
		let name = name.into();
		let key = name.clone();
		self.provide(name, move || context.get(&key));
	}

	pub fn remove(&self, name: &str) -> bool {
		self.providers.write().shift_remove(name).is_some()
	}

	pub fn names(&self) -> Vec<String> {
		self.providers.read().keys().cloned().collect()
	}
}

impl Injector for ProviderStore {
	fn inject(&self, command_id: &str, callable: CommandFn, mut args: CommandArgs) -> Invocation {
		let providers: Vec<(String, Provider)> = self
			.providers
			.read()
			.iter()
			.filter(|(name, _)| !args.keyword.contains_key(*name))
			.map(|(name, provider)| (name.clone(), provider.clone()))
			.collect();
		tracing::trace!(command_id, providers = providers.len(), "injecting arguments");
		Box::new(move || {
			for (name, provider) in providers {
				if let Some(value) = provider() {
					args.keyword.insert(name, value);
				}
			}
			callable(args)
		})
	}
}

impl fmt::Debug for ProviderStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderStore").field("providers", &self.names()).finish()
	}
}
