//! The keybindings registry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use actuate_context::Signal;
use actuate_expr::Expr;
use actuate_keys::{KeyBinding, OperatingSystem};
use parking_lot::RwLock;

use crate::{Disposer, KeybindingRule, RegistryError};


/// A rule resolved for the registry's platform.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredKeybinding {
	pub keybinding: KeyBinding,
	pub command_id: String,
	pub weight: i32,
	pub when: Option<Expr>,
}

/// Refuses a resolved keybinding with a reason.
pub type KeybindingFilter = Arc<dyn Fn(&KeyBinding) -> Result<(), String> + Send + Sync>;

/// Filter refusing bindings with a part that presses only modifier keys.
pub fn reject_modifier_only(keybinding: &KeyBinding) -> Result<(), String> {
	if keybinding.is_modifier_only() {
		Err(format!("'{keybinding}' consists only of modifier keys"))
	} else {
		Ok(())
	}
}

struct KeybindingsInner {
	entries: RwLock<Vec<(u64, RegisteredKeybinding)>>,
	next_id: AtomicU64,
	changed: Signal<()>,
}

/// Platform-resolved keybindings in registration order. Clones share the
/// registry.
#[derive(Clone)]
pub struct KeybindingsRegistry {
	inner: Arc<KeybindingsInner>,
	platform: OperatingSystem,
	filter: Option<KeybindingFilter>,
}

impl Default for KeybindingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl KeybindingsRegistry {
	/// A registry resolving rules for the platform this binary targets.
	pub fn new() -> Self {
		Self::for_platform(OperatingSystem::current())
	}

	pub fn for_platform(platform: OperatingSystem) -> Self {
		Self {
			inner: Arc::new(KeybindingsInner {
				entries: RwLock::new(Vec::new()),
				next_id: AtomicU64::new(0),
				changed: Signal::new("keybindings_changed"),
			}),
			platform,
			filter: None,
		}
	}

	pub fn with_filter(mut self, filter: impl Fn(&KeyBinding) -> Result<(), String> + Send + Sync + 'static) -> Self {
		self.filter = Some(Arc::new(filter));
		self
	}

	pub fn platform(&self) -> OperatingSystem {
		self.platform
	}

	pub fn keybindings_changed(&self) -> &Signal<()> {
		&self.inner.changed
	}

	/// Resolves `rule` for this registry's platform and stores it.
	///
	/// Returns `Ok(None)` without registering anything when the rule has no
	/// source for the platform.
	///
	/// # Errors
	///
	/// [`RegistryError::Validation`] if the source does not decode or parse,
	/// or the filter refuses the binding.
	pub fn register(&self, command_id: &str, rule: &KeybindingRule) -> Result<Option<Disposer>, RegistryError> {
		let Some(source) = rule.source_for(self.platform) else {
			tracing::warn!(command_id, platform = ?self.platform, "keybinding rule has no binding for this platform");
			return Ok(None);
		};
		let invalid = |reason: String| RegistryError::Validation {
			command_id: command_id.to_owned(),
			reason,
		};
		let keybinding = source.resolve(self.platform).map_err(|err| invalid(err.to_string()))?;
		if let Some(filter) = &self.filter {
			filter(&keybinding).map_err(invalid)?;
		}

		let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
		tracing::debug!(command_id, %keybinding, weight = rule.weight, "registered keybinding");
		self.inner.entries.write().push((
			id,
			RegisteredKeybinding {
				keybinding,
				command_id: command_id.to_owned(),
				weight: rule.weight,
				when: rule.when.clone(),
			},
		));
		self.inner.changed.emit(&());

		let registry = Arc::downgrade(&self.inner);
		Ok(Some(Disposer::new(move || remove_entry(&registry, id))))
	}

	/// The first keybinding registered for `command_id`.
	pub fn lookup(&self, command_id: &str) -> Option<KeyBinding> {
		self.inner
			.entries
			.read()
			.iter()
			.find(|(_, entry)| entry.command_id == command_id)
			.map(|(_, entry)| entry.keybinding.clone())
	}

	/// Every registered keybinding in registration order.
	pub fn iter(&self) -> Vec<RegisteredKeybinding> {
		self.inner.entries.read().iter().map(|(_, entry)| entry.clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.inner.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn remove_entry(registry: &Weak<KeybindingsInner>, id: u64) {
	let Some(registry) = registry.upgrade() else {
		return;
	};
	let removed = {
		let mut entries = registry.entries.write();
		let before = entries.len();
		entries.retain(|(existing, _)| *existing != id);
		entries.len() != before
	};
	if removed {
		tracing::debug!(id, "disposed keybinding");
		registry.changed.emit(&());
	}
}

impl fmt::Debug for KeybindingsRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeybindingsRegistry")
			.field("platform", &self.platform)
			.field("len", &self.len())
			.field("filtered", &self.filter.is_some())
			.finish()
	}
}
