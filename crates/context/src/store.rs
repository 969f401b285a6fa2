//! Association table from owner handles to contexts.
//!
//! Objects that want a context of their own ask the store for one and keep
//! the returned [`ContextHandle`]. The scoping parent is named explicitly; an
//! owner without a parent is scoped under the store's root context, which is
//! created on first use. Releasing a handle drops the association (the
//! context itself lives on while other clones of it exist), and a released
//! handle never resolves again even after its slot is reused.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use slab::Slab;

use crate::{Context, ContextError};


/// Stable key for one association in a [`ContextStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle {
	index: usize,
	generation: u64,
}

impl fmt::Display for ContextHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}v{}", self.index, self.generation)
	}
}

struct Slot {
	generation: u64,
	context: Context,
}

#[derive(Default)]
struct StoreInner {
	slots: RwLock<Slots>,
	root: OnceLock<Context>,
}

#[derive(Default)]
struct Slots {
	entries: Slab<Slot>,
	next_generation: u64,
}

/// Shared handle-keyed table of contexts. Clones share the table.
#[derive(Clone, Default)]
pub struct ContextStore {
	inner: Arc<StoreInner>,
}

impl ContextStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// The root context, created on first access.
	pub fn root(&self) -> &Context {
		self.inner.root.get_or_init(|| {
			tracing::debug!("created root context");
			Context::new()
		})
	}

	/// Creates a context scoped under `parent`'s context, or under the root.
	///
	/// # Errors
	///
	/// [`ContextError::UnknownHandle`] if `parent` does not resolve in this
	/// store.
	pub fn create(&self, parent: Option<ContextHandle>) -> Result<(ContextHandle, Context), ContextError> {
		let parent_context = match parent {
			Some(handle) => self.get(handle).ok_or(ContextError::UnknownHandle(handle))?,
			None => self.root().clone(),
		};
		let context = parent_context.new_child();
		let mut slots = self.inner.slots.write();
		slots.next_generation += 1;
		let generation = slots.next_generation;
		let index = slots.entries.insert(Slot {
			generation,
			context: context.clone(),
		});
		let handle = ContextHandle { index, generation };
		tracing::debug!(%handle, depth = context.depth(), "created context");
		Ok((handle, context))
	}

	/// Like [`ContextStore::create`], but the association is released when
	/// the returned lease is dropped.
	///
	/// # Errors
	///
	/// As [`ContextStore::create`].
	pub fn lease(&self, parent: Option<ContextHandle>) -> Result<ContextLease, ContextError> {
		let (handle, context) = self.create(parent)?;
		Ok(ContextLease {
			store: self.clone(),
			handle,
			context,
		})
	}

	pub fn get(&self, handle: ContextHandle) -> Option<Context> {
		let slots = self.inner.slots.read();
		slots
			.entries
			.get(handle.index)
			.filter(|slot| slot.generation == handle.generation)
			.map(|slot| slot.context.clone())
	}

	pub fn contains(&self, handle: ContextHandle) -> bool {
		self.get(handle).is_some()
	}

	/// Drops the association for `handle`. Returns `false` if it was already
	/// released.
	pub fn release(&self, handle: ContextHandle) -> bool {
		let mut slots = self.inner.slots.write();
		let live = slots
			.entries
			.get(handle.index)
			.is_some_and(|slot| slot.generation == handle.generation);
		if live {
			slots.entries.remove(handle.index);
			tracing::debug!(%handle, "released context");
		}
		live
	}

	/// Number of live associations, not counting the root.
	pub fn len(&self) -> usize {
		self.inner.slots.read().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for ContextStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextStore")
			.field("len", &self.len())
			.field("root", &self.inner.root.get().is_some())
			.finish()
	}
}

/// An association that releases itself on drop.
pub struct ContextLease {
	store: ContextStore,
	handle: ContextHandle,
	context: Context,
}

impl ContextLease {
	pub fn handle(&self) -> ContextHandle {
		self.handle
	}

	pub fn context(&self) -> &Context {
		&self.context
	}
}

impl Drop for ContextLease {
	fn drop(&mut self) {
		self.store.release(self.handle);
	}
}

impl fmt::Debug for ContextLease {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextLease").field("handle", &self.handle).finish()
	}
}
