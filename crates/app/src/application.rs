//! The object that owns one instance of each registry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use actuate_context::{Context, ContextKeyCatalog, ContextStore};
use actuate_expr::{ExprError, Value, safe_eval};
use actuate_model::{
	Action, CommandArgs, CommandError, CommandFuture, CommandsRegistry, Disposer, KeybindingsRegistry, MenuGroup,
	MenusRegistry, ProviderStore, RegistryError, register_action, reject_modifier_only,
};
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::ModelConfig;

type Registrations = Mutex<IndexMap<u64, Disposer>>;

/// Registries, injection providers and contexts for one application.
pub struct Application {
	name: String,
	config: ModelConfig,
	commands: CommandsRegistry,
	menus: MenusRegistry,
	keybindings: KeybindingsRegistry,
	providers: ProviderStore,
	contexts: ContextStore,
	context_keys: ContextKeyCatalog,
	registrations: Arc<Registrations>,
	next_registration: AtomicU64,
}

impl Application {
	pub fn new(name: impl Into<String>, config: ModelConfig) -> Self {
		let name = name.into();
		let commands = CommandsRegistry::new();
		commands.set_raise_synchronous_exceptions(config.raise_synchronous_exceptions);
		let providers = ProviderStore::new();
		commands.set_injector(Arc::new(providers.clone()));

		let mut keybindings = KeybindingsRegistry::for_platform(config.platform());
		if config.reject_modifier_only_keybindings {
			keybindings = keybindings.with_filter(reject_modifier_only);
		}
		tracing::debug!(app = %name, platform = ?keybindings.platform(), "created application");

		Self {
			menus: MenusRegistry::with_palette_menu_id(config.palette_menu_id.clone()),
			name,
			config,
			commands,
			keybindings,
			providers,
			contexts: ContextStore::new(),
			context_keys: ContextKeyCatalog::new(),
			registrations: Arc::default(),
			next_registration: AtomicU64::new(0),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn commands(&self) -> &CommandsRegistry {
		&self.commands
	}

	pub fn menus(&self) -> &MenusRegistry {
		&self.menus
	}

	pub fn keybindings(&self) -> &KeybindingsRegistry {
		&self.keybindings
	}

	/// Keyword-argument providers consulted on every command execution.
	pub fn providers(&self) -> &ProviderStore {
		&self.providers
	}

	pub fn contexts(&self) -> &ContextStore {
		&self.contexts
	}

	pub fn context_keys(&self) -> &ContextKeyCatalog {
		&self.context_keys
	}

	/// Registers `action` and tracks it for [`Application::dispose`].
	///
	/// # Errors
	///
	/// As [`register_action`].
	pub fn register_action(&self, action: &Action) -> Result<Disposer, RegistryError> {
		let disposer = register_action(action, &self.commands, &self.menus, &self.keybindings)?;
		let id = self.next_registration.fetch_add(1, Ordering::Relaxed);
		self.registrations.lock().insert(id, disposer);

		let registrations = Arc::downgrade(&self.registrations);
		Ok(Disposer::new(move || release(&registrations, id)))
	}

	/// Registers every action or none of them.
	///
	/// # Errors
	///
	/// The first failing registration; actions registered earlier in the
	/// call are disposed again.
	pub fn register_actions<'a>(&self, actions: impl IntoIterator<Item = &'a Action>) -> Result<Disposer, RegistryError> {
		let mut disposers = Vec::new();
		for action in actions {
			match self.register_action(action) {
				Ok(disposer) => disposers.push(disposer),
				Err(err) => {
					Disposer::chain(disposers).dispose();
					return Err(err);
				}
			}
		}
		Ok(Disposer::chain(disposers))
	}

	/// Number of live action registrations.
	pub fn registered(&self) -> usize {
		self.registrations.lock().len()
	}

	/// Reverses every registration made through this application, newest
	/// first.
	pub fn dispose(&self) {
		let drained: Vec<Disposer> = self.registrations.lock().drain(..).map(|(_, disposer)| disposer).collect();
		if drained.is_empty() {
			return;
		}
		tracing::debug!(app = %self.name, registrations = drained.len(), "disposing application");
		Disposer::chain(drained).dispose();
	}

	/// Runs a command synchronously.
	///
	/// # Errors
	///
	/// As [`CommandsRegistry::execute`].
	pub fn execute(&self, command_id: &str, args: CommandArgs) -> Result<CommandFuture, CommandError> {
		self.commands.execute(command_id, args)
	}

	/// Whether `command_id` is registered and its enablement holds in
	/// `context`.
	///
	/// # Errors
	///
	/// Evaluation failures of the enablement expression.
	pub fn is_enabled(&self, command_id: &str, context: &Context) -> Result<bool, ExprError> {
		let Some(rule) = self.commands.get(command_id) else {
			return Ok(false);
		};
		match &rule.enablement {
			Some(enablement) => Ok(safe_eval(enablement, context)?.is_truthy()),
			None => Ok(true),
		}
	}

	/// The groups of `menu_id` holding only entries whose `when` holds in
	/// `context`. Groups left empty are omitted.
	///
	/// # Errors
	///
	/// The first guard that fails to evaluate.
	pub fn visible_menu(&self, menu_id: &str, context: &Context) -> Result<Vec<MenuGroup>, ExprError> {
		let mut visible = Vec::new();
		for group in self.menus.iter_groups(menu_id) {
			let mut entries = Vec::with_capacity(group.entries.len());
			for entry in group.entries {
				let shown = match entry.when() {
					Some(when) => safe_eval(when, context)?,
					None => Value::Bool(true),
				};
				if shown.is_truthy() {
					entries.push(entry);
				}
			}
			if !entries.is_empty() {
				visible.push(MenuGroup {
					name: group.name,
					entries,
				});
			}
		}
		Ok(visible)
	}
}

fn release(registrations: &Weak<Registrations>, id: u64) {
	let Some(registrations) = registrations.upgrade() else {
		return;
	};
	let disposer = registrations.lock().shift_remove(&id);
	if let Some(mut disposer) = disposer {
		disposer.dispose();
	}
}

impl fmt::Debug for Application {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Application")
			.field("name", &self.name)
			.field("commands", &self.commands.len())
			.field("keybindings", &self.keybindings.len())
			.field("menus", &self.menus.menu_ids())
			.field("registrations", &self.registered())
			.finish()
	}
}
