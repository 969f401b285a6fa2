//! The commands registry: one callable plus presentation metadata per id.

mod args;
mod future;
mod symbols;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use actuate_context::Signal;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tokio::sync::oneshot;

pub use self::args::CommandArgs;
pub use self::future::{CommandFuture, CommandResult};
pub use self::symbols::SymbolTable;
use crate::disposer::panic_message;
use crate::injector::{Injector, Invocation, Passthrough};
use crate::{Callback, CommandError, CommandFn, CommandRule, Disposer, RegistryError, ResolutionError, worker};

#[cfg(test)]
mod tests;

struct CommandEntry {
	rule: CommandRule,
	callback: Callback,
	/// First resolution outcome of a reference callback, failures included.
	resolved: OnceLock<Result<CommandFn, ResolutionError>>,
}

struct CommandsInner {
	commands: RwLock<IndexMap<String, Arc<CommandEntry>>>,
	symbols: SymbolTable,
	injector: RwLock<Arc<dyn Injector>>,
	raise_synchronous_exceptions: AtomicBool,
	registered: Signal<String>,
}

/// Registered commands keyed by id. Clones share the registry.
#[derive(Clone)]
pub struct CommandsRegistry {
	inner: Arc<CommandsInner>,
}

impl Default for CommandsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl CommandsRegistry {
	pub fn new() -> Self {
		Self::with_symbols(SymbolTable::new())
	}

	/// A registry resolving reference callbacks against `symbols`.
	pub fn with_symbols(symbols: SymbolTable) -> Self {
		Self {
			inner: Arc::new(CommandsInner {
				commands: RwLock::new(IndexMap::new()),
				symbols,
				injector: RwLock::new(Arc::new(Passthrough)),
				raise_synchronous_exceptions: AtomicBool::new(false),
				registered: Signal::new("commands_registered"),
			}),
		}
	}

	pub fn symbols(&self) -> &SymbolTable {
		&self.inner.symbols
	}

	pub fn set_injector(&self, injector: Arc<dyn Injector>) {
		*self.inner.injector.write() = injector;
	}

	/// In fail-fast mode a failing synchronous execution returns its error
	/// directly instead of through the deferred result.
	pub fn set_raise_synchronous_exceptions(&self, raise: bool) {
		self.inner.raise_synchronous_exceptions.store(raise, Ordering::Relaxed);
	}

	pub fn raises_synchronous_exceptions(&self) -> bool {
		self.inner.raise_synchronous_exceptions.load(Ordering::Relaxed)
	}

	/// Emitted with the command id after each successful registration.
	pub fn commands_registered(&self) -> &Signal<String> {
		&self.inner.registered
	}

	/// Registers a command.
	///
	/// # Errors
	///
	/// [`RegistryError::Conflict`] if the id is taken; the existing
	/// registration is left untouched. [`RegistryError::InvalidAction`] for an
	/// empty id.
	pub fn register(&self, rule: CommandRule, callback: impl Into<Callback>) -> Result<Disposer, RegistryError> {
		if rule.id.is_empty() {
			return Err(RegistryError::InvalidAction {
				id: rule.id,
				reason: "command id is empty".into(),
			});
		}
		let id = rule.id.clone();
		let entry = Arc::new(CommandEntry {
			rule,
			callback: callback.into(),
			resolved: OnceLock::new(),
		});
		{
			let mut commands = self.inner.commands.write();
			if commands.contains_key(&id) {
				tracing::debug!(command_id = %id, "command id conflict");
				return Err(RegistryError::Conflict(id));
			}
			commands.insert(id.clone(), entry.clone());
		}
		tracing::debug!(command_id = %id, "registered command");
		self.inner.registered.emit(&id);

		let registry = Arc::downgrade(&self.inner);
		let entry = Arc::downgrade(&entry);
		Ok(Disposer::new(move || dispose_command(&registry, &id, &entry)))
	}

	pub fn get(&self, id: &str) -> Option<CommandRule> {
		self.inner.commands.read().get(id).map(|entry| entry.rule.clone())
	}

	pub fn contains(&self, id: &str) -> bool {
		self.inner.commands.read().contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.inner.commands.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Registered commands in registration order.
	pub fn iter(&self) -> Vec<CommandRule> {
		self.inner.commands.read().values().map(|entry| entry.rule.clone()).collect()
	}

	/// Runs command `id` on the calling thread.
	///
	/// # Errors
	///
	/// [`CommandError::NotFound`] or [`CommandError::Resolution`] before the
	/// callback runs. The callback's own failure is returned here only in
	/// fail-fast mode; otherwise it is held by the returned future.
	pub fn execute(&self, id: &str, args: CommandArgs) -> Result<CommandFuture, CommandError> {
		let invocation = self.prepare(id, args)?;
		let result = run(id, invocation);
		if let Err(err) = &result {
			tracing::debug!(command_id = id, error = %err, "command failed");
			if self.raises_synchronous_exceptions() {
				return Err(err.clone());
			}
		}
		Ok(CommandFuture::ready(id, result))
	}

	/// Runs command `id` on a dedicated worker thread and returns immediately.
	///
	/// # Errors
	///
	/// [`CommandError::NotFound`] or [`CommandError::Resolution`] before
	/// anything is spawned, [`CommandError::Io`] if the thread cannot start.
	pub fn execute_async(&self, id: &str, args: CommandArgs) -> Result<CommandFuture, CommandError> {
		let invocation = self.prepare(id, args)?;
		let (sender, receiver) = oneshot::channel();
		let command_id = id.to_owned();
		worker::spawn_named_thread(id, move || {
			let result = run(&command_id, invocation);
			if sender.send(result).is_err() {
				tracing::trace!(command_id = %command_id, "command result abandoned");
			}
		})
		.map_err(|err| CommandError::Io(err.to_string()))?;
		Ok(CommandFuture::pending(id, receiver))
	}

	fn prepare(&self, id: &str, args: CommandArgs) -> Result<Invocation, CommandError> {
		let entry = self
			.inner
			.commands
			.read()
			.get(id)
			.cloned()
			.ok_or_else(|| CommandError::NotFound(id.to_owned()))?;
		let callable = self.callable(&entry)?;
		let injector = self.inner.injector.read().clone();
		tracing::trace!(command_id = id, "executing command");
		Ok(injector.inject(id, callable, args))
	}

	fn callable(&self, entry: &CommandEntry) -> Result<CommandFn, ResolutionError> {
		match &entry.callback {
			Callback::Function(f) => Ok(f.clone()),
			Callback::Reference(reference) => entry
				.resolved
				.get_or_init(|| {
					let resolved = self.inner.symbols.resolve(reference);
					match &resolved {
						Ok(_) => tracing::debug!(command_id = %entry.rule.id, reference = %reference, "resolved command reference"),
						Err(err) => tracing::warn!(command_id = %entry.rule.id, error = %err, "command reference failed to resolve"),
					}
					resolved
				})
				.clone(),
		}
	}
}

fn run(command_id: &str, invocation: Invocation) -> CommandResult {
	catch_unwind(AssertUnwindSafe(invocation)).unwrap_or_else(|payload| {
		Err(CommandError::Panicked {
			command_id: command_id.to_owned(),
			message: panic_message(payload.as_ref()),
		})
	})
}

fn dispose_command(registry: &Weak<CommandsInner>, id: &str, entry: &Weak<CommandEntry>) {
	let Some(registry) = registry.upgrade() else {
		return;
	};
	let mut commands = registry.commands.write();
	let current = commands
		.get(id)
		.is_some_and(|existing| std::ptr::eq(Arc::as_ptr(existing), entry.as_ptr()));
	if current {
		commands.shift_remove(id);
		tracing::debug!(command_id = id, "disposed command");
	}
}

impl fmt::Debug for CommandsRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandsRegistry")
			.field("commands", &self.inner.commands.read().keys().collect::<Vec<_>>())
			.field("raise_synchronous_exceptions", &self.raises_synchronous_exceptions())
			.finish()
	}
}
