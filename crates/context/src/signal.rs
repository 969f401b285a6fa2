//! Synchronous multi-listener notifications.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifies one connected listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A list of listeners called in connection order on every [`Signal::emit`].
///
/// The listener list is snapshotted before dispatch, so listeners may connect
/// or disconnect (including themselves) while being called.
pub struct Signal<T> {
	name: &'static str,
	listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
	next_id: AtomicU64,
}

impl<T> Signal<T> {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			listeners: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(0),
		}
	}

	pub fn connect(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push((id, Arc::new(listener)));
		id
	}

	/// Returns `false` if `id` was not connected.
	pub fn disconnect(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();
		listeners.retain(|(existing, _)| *existing != id);
		listeners.len() != before
	}

	pub fn emit(&self, value: &T) {
		let snapshot: Vec<Listener<T>> = self.listeners.lock().iter().map(|(_, l)| l.clone()).collect();
		tracing::trace!(signal = self.name, listeners = snapshot.len(), "emit");
		for listener in snapshot {
			listener(value);
		}
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}
}

impl<T> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("name", &self.name)
			.field("listeners", &self.listener_count())
			.finish()
	}
}
