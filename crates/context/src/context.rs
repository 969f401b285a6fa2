//! Layered key-value scopes that announce their changes.
//!
//! A [`Context`] owns one layer of values and optionally a parent. Reads walk
//! the layer chain from the context itself towards the root and the first
//! match wins; writes always land in the context's own layer.
//!
//! Every context has a change signal carrying the set of keys that changed.
//! A child forwards everything its parent announces, so subscribing to the
//! innermost context is enough to observe the whole chain. Nothing flows from
//! child to parent.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use actuate_expr::{Condition, ExprError, Namespace, Value, safe_eval};
use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, RwLock};

use crate::{Signal, SubscriptionId};


/// Keys reported by one change event, sorted.
pub type ChangeSet = BTreeSet<String>;

/// Shared handle to one context layer. Clones refer to the same layer.
#[derive(Clone)]
pub struct Context {
	inner: Arc<Inner>,
}

struct Inner {
	values: RwLock<IndexMap<String, Value>>,
	parent: Option<Context>,
	parent_subscription: Option<SubscriptionId>,
	changed: Signal<ChangeSet>,
	buffer: Mutex<Buffer>,
}

#[derive(Default)]
struct Buffer {
	depth: usize,
	pending: ChangeSet,
}

impl Drop for Inner {
	fn drop(&mut self) {
		if let (Some(parent), Some(id)) = (&self.parent, self.parent_subscription) {
			parent.inner.changed.disconnect(id);
		}
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

impl Context {
	/// An empty root context.
	pub fn new() -> Self {
		Self::with_values(std::iter::empty::<(String, Value)>())
	}

	/// A root context seeded with `values`. Seeding emits nothing.
	pub fn with_values<K: Into<String>>(values: impl IntoIterator<Item = (K, Value)>) -> Self {
		Self::build(None, values)
	}

	/// A child layered on top of this context.
	pub fn new_child(&self) -> Self {
		self.new_child_with(std::iter::empty::<(String, Value)>())
	}

	/// A child layered on top of this context, seeded with `values`.
	pub fn new_child_with<K: Into<String>>(&self, values: impl IntoIterator<Item = (K, Value)>) -> Self {
		Self::build(Some(self.clone()), values)
	}

	fn build<K: Into<String>>(parent: Option<Context>, values: impl IntoIterator<Item = (K, Value)>) -> Self {
		let values: IndexMap<String, Value> = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
		let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
			let parent_subscription = parent.as_ref().map(|parent| {
				let weak = weak.clone();
				parent.inner.changed.connect(move |keys: &ChangeSet| {
					if let Some(child) = weak.upgrade() {
						Context { inner: child }.notify(keys.clone());
					}
				})
			});
			Inner {
				values: RwLock::new(values),
				parent,
				parent_subscription,
				changed: Signal::new("context.changed"),
				buffer: Mutex::new(Buffer::default()),
			}
		});
		Self { inner }
	}

	pub fn parent(&self) -> Option<&Context> {
		self.inner.parent.as_ref()
	}

	/// Number of layers between this context and its root.
	pub fn depth(&self) -> usize {
		self.layers().count() - 1
	}

	fn layers(&self) -> impl Iterator<Item = &Context> {
		std::iter::successors(Some(self), |ctx| ctx.parent())
	}

	/// Looks `key` up through the layer chain.
	pub fn get(&self, key: &str) -> Option<Value> {
		self.layers().find_map(|ctx| ctx.inner.values.read().get(key).cloned())
	}

	pub fn contains(&self, key: &str) -> bool {
		self.layers().any(|ctx| ctx.inner.values.read().contains_key(key))
	}

	/// Whether `key` is stored in this context's own layer.
	pub fn contains_own(&self, key: &str) -> bool {
		self.inner.values.read().contains_key(key)
	}

	/// All visible keys, own layer first, each listed once.
	pub fn keys(&self) -> Vec<String> {
		let mut keys = IndexSet::new();
		for ctx in self.layers() {
			keys.extend(ctx.inner.values.read().keys().cloned());
		}
		keys.into_iter().collect()
	}

	/// Flattens the chain into one map; nearer layers shadow farther ones.
	pub fn to_map(&self) -> IndexMap<String, Value> {
		let mut map = IndexMap::new();
		for ctx in self.layers() {
			for (key, value) in ctx.inner.values.read().iter() {
				map.entry(key.clone()).or_insert_with(|| value.clone());
			}
		}
		map
	}

	/// Stores `value` in this layer and returns the previous own value.
	///
	/// Announces `{key}` unless an equal value was already stored here.
	pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();
		let previous = self.inner.values.write().insert(key.clone(), value.clone());
		if previous.as_ref() != Some(&value) {
			self.notify(ChangeSet::from([key]));
		}
		previous
	}

	/// Removes `key` from this layer. Announces `{key}` if it was present.
	pub fn remove(&self, key: &str) -> Option<Value> {
		let previous = self.inner.values.write().shift_remove(key);
		if previous.is_some() {
			self.notify(ChangeSet::from([key.to_owned()]));
		}
		previous
	}

	/// Sets several keys, announcing them as one event.
	pub fn update<K: Into<String>>(&self, values: impl IntoIterator<Item = (K, Value)>) {
		self.buffered(|ctx| {
			for (key, value) in values {
				ctx.set(key, value);
			}
		});
	}

	/// Runs `body` with change announcements held back; all keys changed
	/// inside are announced once, as a single event, when `body` returns or
	/// unwinds. Nested calls flush with the outermost one.
	pub fn buffered<R>(&self, body: impl FnOnce(&Context) -> R) -> R {
		let _guard = self.buffer();
		body(self)
	}

	/// Holds back change announcements until the returned guard is dropped.
	pub fn buffer(&self) -> BufferGuard<'_> {
		self.inner.buffer.lock().depth += 1;
		BufferGuard { context: self }
	}

	fn notify(&self, keys: ChangeSet) {
		{
			let mut buffer = self.inner.buffer.lock();
			if buffer.depth > 0 {
				buffer.pending.extend(keys);
				return;
			}
		}
		tracing::trace!(keys = ?keys, "context changed");
		self.inner.changed.emit(&keys);
	}

	/// Calls `listener` with the changed keys after every change visible from
	/// this context, including changes made in ancestors.
	pub fn subscribe(&self, listener: impl Fn(&ChangeSet) + Send + Sync + 'static) -> SubscriptionId {
		self.inner.changed.connect(listener)
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.inner.changed.disconnect(id)
	}

	/// Evaluates a guard against this context.
	///
	/// # Errors
	///
	/// Parse failures for text guards and evaluation failures, including
	/// names missing from every layer.
	pub fn evaluate(&self, condition: impl Into<Condition>) -> Result<Value, ExprError> {
		safe_eval(condition, self)
	}

	/// Whether two handles refer to the same layer.
	pub fn ptr_eq(&self, other: &Context) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Namespace for Context {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.get(name)
	}

	fn contains(&self, name: &str) -> bool {
		Context::contains(self, name)
	}
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("values", &*self.inner.values.read())
			.field("depth", &self.depth())
			.finish()
	}
}

/// Scope returned by [`Context::buffer`].
#[must_use = "changes are announced when the guard is dropped"]
pub struct BufferGuard<'a> {
	context: &'a Context,
}

impl Drop for BufferGuard<'_> {
	fn drop(&mut self) {
		let pending = {
			let mut buffer = self.context.inner.buffer.lock();
			buffer.depth = buffer.depth.saturating_sub(1);
			if buffer.depth > 0 || buffer.pending.is_empty() {
				return;
			}
			std::mem::take(&mut buffer.pending)
		};
		self.context.notify(pending);
	}
}
