//! Declarative records describing commands, menu placements and keybindings.

use std::fmt;
use std::sync::Arc;

use actuate_expr::{Expr, Value};
use actuate_keys::{KeyBindingSource, OperatingSystem, StandardKeyBinding};

use crate::{CommandArgs, CommandError, RegistryError};

/// Light and dark variants of an icon reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Icon {
	pub dark: Option<String>,
	pub light: Option<String>,
}

impl From<&str> for Icon {
	fn from(both: &str) -> Self {
		Self {
			dark: Some(both.to_owned()),
			light: Some(both.to_owned()),
		}
	}
}

/// Presentation metadata for a command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandRule {
	pub id: String,
	pub title: String,
	pub category: Option<String>,
	pub tooltip: Option<String>,
	pub status_tip: Option<String>,
	pub short_title: Option<String>,
	pub icon: Option<Icon>,
	/// Guard deciding whether the command can currently run.
	pub enablement: Option<Expr>,
}

impl CommandRule {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			..Self::default()
		}
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	pub fn with_icon(mut self, icon: impl Into<Icon>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn with_enablement(mut self, enablement: impl Into<Expr>) -> Self {
		self.enablement = Some(enablement.into());
		self
	}

	/// `"Category: Title"` when a category is set.
	pub fn display_title(&self) -> String {
		match &self.category {
			Some(category) => format!("{category}: {}", self.title),
			None => self.title.clone(),
		}
	}
}

pub type CommandFn = Arc<dyn Fn(CommandArgs) -> Result<Value, CommandError> + Send + Sync>;

/// A command's implementation: a callable, or a `"module.path:symbol"`
/// reference resolved on first execution.
#[derive(Clone)]
pub enum Callback {
	Function(CommandFn),
	Reference(String),
}

impl Callback {
	pub fn new(f: impl Fn(CommandArgs) -> Result<Value, CommandError> + Send + Sync + 'static) -> Self {
		Self::Function(Arc::new(f))
	}

	pub fn reference(path: impl Into<String>) -> Self {
		Self::Reference(path.into())
	}
}

impl From<&str> for Callback {
	fn from(path: &str) -> Self {
		Self::reference(path)
	}
}

impl From<String> for Callback {
	fn from(path: String) -> Self {
		Self::Reference(path)
	}
}

impl From<CommandFn> for Callback {
	fn from(f: CommandFn) -> Self {
		Self::Function(f)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Function(_) => f.write_str("Callback::Function(..)"),
			Self::Reference(path) => f.debug_tuple("Callback::Reference").field(path).finish(),
		}
	}
}

/// Where an action appears in a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuRule {
	pub menu_id: String,
	pub when: Option<Expr>,
	pub group: Option<String>,
	pub order: Option<f64>,
}

impl MenuRule {
	pub fn new(menu_id: impl Into<String>) -> Self {
		Self {
			menu_id: menu_id.into(),
			when: None,
			group: None,
			order: None,
		}
	}

	pub fn with_when(mut self, when: impl Into<Expr>) -> Self {
		self.when = Some(when.into());
		self
	}

	pub fn in_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn with_order(mut self, order: f64) -> Self {
		self.order = Some(order);
		self
	}
}

/// A command placed in a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
	pub command: CommandRule,
	pub when: Option<Expr>,
	pub group: Option<String>,
	pub order: Option<f64>,
	/// Shown instead of `command` while the alternate modifier is held.
	pub alt: Option<CommandRule>,
}

impl MenuItem {
	pub fn new(command: CommandRule) -> Self {
		Self {
			command,
			when: None,
			group: None,
			order: None,
			alt: None,
		}
	}

	pub fn with_when(mut self, when: impl Into<Expr>) -> Self {
		self.when = Some(when.into());
		self
	}

	pub fn in_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn with_order(mut self, order: f64) -> Self {
		self.order = Some(order);
		self
	}

	pub fn with_alt(mut self, alt: CommandRule) -> Self {
		self.alt = Some(alt);
		self
	}
}

/// A nested menu placed in a parent menu.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuItem {
	pub submenu_id: String,
	pub title: String,
	pub icon: Option<Icon>,
	pub enablement: Option<Expr>,
	pub when: Option<Expr>,
	pub group: Option<String>,
	pub order: Option<f64>,
}

impl SubmenuItem {
	pub fn new(submenu_id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			submenu_id: submenu_id.into(),
			title: title.into(),
			icon: None,
			enablement: None,
			when: None,
			group: None,
			order: None,
		}
	}

	pub fn with_when(mut self, when: impl Into<Expr>) -> Self {
		self.when = Some(when.into());
		self
	}

	pub fn in_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	pub fn with_order(mut self, order: f64) -> Self {
		self.order = Some(order);
		self
	}
}

/// One entry of a menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
	Item(MenuItem),
	Submenu(SubmenuItem),
}

impl MenuEntry {
	pub fn when(&self) -> Option<&Expr> {
		match self {
			Self::Item(item) => item.when.as_ref(),
			Self::Submenu(submenu) => submenu.when.as_ref(),
		}
	}

	pub fn group(&self) -> Option<&str> {
		match self {
			Self::Item(item) => item.group.as_deref(),
			Self::Submenu(submenu) => submenu.group.as_deref(),
		}
	}

	pub fn order(&self) -> Option<f64> {
		match self {
			Self::Item(item) => item.order,
			Self::Submenu(submenu) => submenu.order,
		}
	}

	/// The command id for items, `None` for submenus.
	pub fn command_id(&self) -> Option<&str> {
		match self {
			Self::Item(item) => Some(&item.command.id),
			Self::Submenu(_) => None,
		}
	}
}

impl From<MenuItem> for MenuEntry {
	fn from(item: MenuItem) -> Self {
		Self::Item(item)
	}
}

impl From<SubmenuItem> for MenuEntry {
	fn from(submenu: SubmenuItem) -> Self {
		Self::Submenu(submenu)
	}
}

/// A keybinding with optional per-platform overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeybindingRule {
	pub primary: Option<KeyBindingSource>,
	pub win: Option<KeyBindingSource>,
	pub mac: Option<KeyBindingSource>,
	pub linux: Option<KeyBindingSource>,
	pub when: Option<Expr>,
	pub weight: i32,
}

impl KeybindingRule {
	pub fn new(primary: impl Into<KeyBindingSource>) -> Self {
		Self {
			primary: Some(primary.into()),
			..Self::default()
		}
	}

	/// Rule for a well-known shortcut, carrying its platform overrides.
	pub fn standard(binding: StandardKeyBinding) -> Self {
		let codes = binding.codes();
		Self {
			primary: codes.primary.map(KeyBindingSource::Code),
			win: codes.win.map(KeyBindingSource::Code),
			mac: codes.mac.map(KeyBindingSource::Code),
			linux: codes.linux.map(KeyBindingSource::Code),
			..Self::default()
		}
	}

	pub fn with_win(mut self, source: impl Into<KeyBindingSource>) -> Self {
		self.win = Some(source.into());
		self
	}

	pub fn with_mac(mut self, source: impl Into<KeyBindingSource>) -> Self {
		self.mac = Some(source.into());
		self
	}

	pub fn with_linux(mut self, source: impl Into<KeyBindingSource>) -> Self {
		self.linux = Some(source.into());
		self
	}

	pub fn with_when(mut self, when: impl Into<Expr>) -> Self {
		self.when = Some(when.into());
		self
	}

	pub fn with_weight(mut self, weight: i32) -> Self {
		self.weight = weight;
		self
	}

	/// The source that applies on `os`: the platform field, else `primary`.
	pub fn source_for(&self, os: OperatingSystem) -> Option<&KeyBindingSource> {
		let specific = match os {
			OperatingSystem::Windows => self.win.as_ref(),
			OperatingSystem::MacOS => self.mac.as_ref(),
			OperatingSystem::Linux => self.linux.as_ref(),
		};
		specific.or(self.primary.as_ref())
	}
}

/// A command together with its menu placements and keybindings.
#[derive(Debug, Clone)]
pub struct Action {
	pub command: CommandRule,
	pub callback: Callback,
	pub menus: Vec<MenuRule>,
	pub keybindings: Vec<KeybindingRule>,
	/// Also list the command in the command palette menu.
	pub add_to_palette: bool,
}

impl Action {
	pub fn new(id: impl Into<String>, title: impl Into<String>, callback: impl Into<Callback>) -> Self {
		Self::from_rule(CommandRule::new(id, title), callback)
	}

	pub fn from_rule(command: CommandRule, callback: impl Into<Callback>) -> Self {
		Self {
			command,
			callback: callback.into(),
			menus: Vec::new(),
			keybindings: Vec::new(),
			add_to_palette: true,
		}
	}

	pub fn id(&self) -> &str {
		&self.command.id
	}

	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.command.category = Some(category.into());
		self
	}

	pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.command.tooltip = Some(tooltip.into());
		self
	}

	pub fn with_icon(mut self, icon: impl Into<Icon>) -> Self {
		self.command.icon = Some(icon.into());
		self
	}

	pub fn with_enablement(mut self, enablement: impl Into<Expr>) -> Self {
		self.command.enablement = Some(enablement.into());
		self
	}

	pub fn with_menu(mut self, menu: MenuRule) -> Self {
		self.menus.push(menu);
		self
	}

	pub fn with_keybinding(mut self, keybinding: KeybindingRule) -> Self {
		self.keybindings.push(keybinding);
		self
	}

	pub fn hidden_from_palette(mut self) -> Self {
		self.add_to_palette = false;
		self
	}

	/// Checks the fields registration relies on.
	///
	/// # Errors
	///
	/// [`RegistryError::InvalidAction`] naming the first malformed field.
	pub fn validate(&self) -> Result<(), RegistryError> {
		let invalid = |reason: String| RegistryError::InvalidAction {
			id: self.command.id.clone(),
			reason,
		};
		if self.command.id.trim().is_empty() {
			return Err(invalid("command id is empty".into()));
		}
		if let Callback::Reference(path) = &self.callback
			&& path.trim().is_empty()
		{
			return Err(invalid("callback reference is empty".into()));
		}
		for menu in &self.menus {
			if menu.menu_id.is_empty() {
				return Err(invalid("menu id is empty".into()));
			}
			if menu.order.is_some_and(|order| !order.is_finite()) {
				return Err(invalid(format!("order in menu '{}' is not finite", menu.menu_id)));
			}
		}
		Ok(())
	}
}
