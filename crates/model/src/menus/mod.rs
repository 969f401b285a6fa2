//! The menus registry.
//!
//! Each menu id holds its entries in insertion order. Presentation layers read
//! them back through [`MenusRegistry::iter_groups`], which clusters entries by
//! group and orders them for display:
//!
//! - the `"navigation"` group comes first, other named groups follow in
//!   lexicographic order, and ungrouped entries form a trailing group;
//! - within a group entries are ordered by `order`, a missing order counting
//!   as `0`, ties keeping insertion order.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use actuate_context::Signal;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{Action, Disposer, MenuEntry, MenuItem};


/// Group that always sorts first.
pub const NAVIGATION_GROUP: &str = "navigation";

/// Default id of the command palette menu.
pub const COMMAND_PALETTE: &str = "commandPalette";

/// Ids of the menus touched by one change.
pub type MenuIds = BTreeSet<String>;

/// One cluster of entries returned by [`MenusRegistry::iter_groups`].
#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
	/// `None` for the trailing group of ungrouped entries.
	pub name: Option<String>,
	pub entries: Vec<MenuEntry>,
}

struct Slot {
	id: u64,
	entry: MenuEntry,
}

struct MenusInner {
	menus: RwLock<IndexMap<String, Vec<Slot>>>,
	next_slot: AtomicU64,
	changed: Signal<MenuIds>,
	palette_menu_id: String,
}

/// Menu entries keyed by menu id. Clones share the registry.
#[derive(Clone)]
pub struct MenusRegistry {
	inner: Arc<MenusInner>,
}

impl Default for MenusRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl MenusRegistry {
	pub fn new() -> Self {
		Self::with_palette_menu_id(COMMAND_PALETTE)
	}

	pub fn with_palette_menu_id(palette_menu_id: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(MenusInner {
				menus: RwLock::new(IndexMap::new()),
				next_slot: AtomicU64::new(0),
				changed: Signal::new("menus_changed"),
				palette_menu_id: palette_menu_id.into(),
			}),
		}
	}

	pub fn palette_menu_id(&self) -> &str {
		&self.inner.palette_menu_id
	}

	/// Emitted with the ids of the menus an append or dispose touched.
	pub fn menus_changed(&self) -> &Signal<MenuIds> {
		&self.inner.changed
	}

	/// Appends entries to their menus and returns a disposer removing exactly
	/// those entries. Menus left empty by the disposer are dropped.
	pub fn append_items<M, E>(&self, items: impl IntoIterator<Item = (M, E)>) -> Disposer
	where
		M: Into<String>,
		E: Into<MenuEntry>,
	{
		let mut placed: Vec<(String, u64)> = Vec::new();
		{
			let mut menus = self.inner.menus.write();
			for (menu_id, entry) in items {
				let menu_id = menu_id.into();
				let id = self.inner.next_slot.fetch_add(1, Ordering::Relaxed);
				menus.entry(menu_id.clone()).or_default().push(Slot {
					id,
					entry: entry.into(),
				});
				placed.push((menu_id, id));
			}
		}
		if placed.is_empty() {
			return Disposer::noop();
		}
		let changed: MenuIds = placed.iter().map(|(menu_id, _)| menu_id.clone()).collect();
		tracing::debug!(entries = placed.len(), menus = ?changed, "appended menu entries");
		self.inner.changed.emit(&changed);

		let registry = Arc::downgrade(&self.inner);
		Disposer::new(move || remove_slots(&registry, placed))
	}

	/// Places an action in each of its menus and, unless it opted out, in the
	/// command palette guarded by its enablement.
	pub fn append_action_menus(&self, action: &Action) -> Disposer {
		let mut items: Vec<(String, MenuEntry)> = action
			.menus
			.iter()
			.map(|rule| {
				let item = MenuItem {
					command: action.command.clone(),
					when: rule.when.clone(),
					group: rule.group.clone(),
					order: rule.order,
					alt: None,
				};
				(rule.menu_id.clone(), MenuEntry::Item(item))
			})
			.collect();
		if action.add_to_palette {
			let item = MenuItem {
				when: action.command.enablement.clone(),
				..MenuItem::new(action.command.clone())
			};
			items.push((self.inner.palette_menu_id.clone(), MenuEntry::Item(item)));
		}
		self.append_items(items)
	}

	pub fn contains(&self, menu_id: &str) -> bool {
		self.inner.menus.read().contains_key(menu_id)
	}

	/// Ids of non-empty menus in first-use order.
	pub fn menu_ids(&self) -> Vec<String> {
		self.inner.menus.read().keys().cloned().collect()
	}

	/// Entries of `menu_id` in insertion order.
	pub fn get_menu(&self, menu_id: &str) -> Vec<MenuEntry> {
		self.inner
			.menus
			.read()
			.get(menu_id)
			.map(|slots| slots.iter().map(|slot| slot.entry.clone()).collect())
			.unwrap_or_default()
	}

	/// Entries of `menu_id` grouped and sorted for display.
	pub fn iter_groups(&self, menu_id: &str) -> Vec<MenuGroup> {
		let mut groups: IndexMap<Option<String>, Vec<MenuEntry>> = IndexMap::new();
		for entry in self.get_menu(menu_id) {
			groups.entry(entry.group().map(str::to_owned)).or_default().push(entry);
		}
		let mut groups: Vec<MenuGroup> = groups
			.into_iter()
			.map(|(name, mut entries)| {
				entries.sort_by(compare_order);
				MenuGroup { name, entries }
			})
			.collect();
		groups.sort_by(|a, b| group_rank(a.name.as_deref()).cmp(&group_rank(b.name.as_deref())));
		groups
	}

	/// Entries of `menu_id` in display order, groups flattened.
	pub fn iter_menu(&self, menu_id: &str) -> Vec<MenuEntry> {
		self.iter_groups(menu_id).into_iter().flat_map(|group| group.entries).collect()
	}
}

fn group_rank(name: Option<&str>) -> (u8, &str) {
	match name {
		Some(NAVIGATION_GROUP) => (0, ""),
		Some(name) => (1, name),
		None => (2, ""),
	}
}

fn compare_order(a: &MenuEntry, b: &MenuEntry) -> CmpOrdering {
	a.order().unwrap_or(0.0).total_cmp(&b.order().unwrap_or(0.0))
}

fn remove_slots(registry: &Weak<MenusInner>, placed: Vec<(String, u64)>) {
	let Some(registry) = registry.upgrade() else {
		return;
	};
	let mut changed = MenuIds::new();
	{
		let mut menus = registry.menus.write();
		for (menu_id, id) in placed {
			let Some(slots) = menus.get_mut(&menu_id) else {
				continue;
			};
			let before = slots.len();
			slots.retain(|slot| slot.id != id);
			if slots.len() != before {
				if slots.is_empty() {
					menus.shift_remove(&menu_id);
				}
				changed.insert(menu_id);
			}
		}
	}
	if !changed.is_empty() {
		tracing::debug!(menus = ?changed, "disposed menu entries");
		registry.changed.emit(&changed);
	}
}

impl fmt::Debug for MenusRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MenusRegistry")
			.field("menus", &self.menu_ids())
			.field("palette_menu_id", &self.inner.palette_menu_id)
			.finish()
	}
}
