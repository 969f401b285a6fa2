//! Handles that reverse one registration.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

type DisposeFn = Box<dyn FnOnce() + Send>;

/// Reverses exactly one registration when [`Disposer::dispose`] is called.
///
/// Disposing twice is a no-op. Dropping a disposer without calling it leaves
/// the registration in place.
pub struct Disposer {
	action: Option<DisposeFn>,
}

impl Disposer {
	pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
		Self {
			action: Some(Box::new(action)),
		}
	}

	/// A disposer with nothing to undo.
	pub fn noop() -> Self {
		Self { action: None }
	}

	/// Combines `children` into one disposer that runs them in reverse order.
	///
	/// A child that panics is logged and skipped; the remaining children
	/// still run.
	pub fn chain(children: impl IntoIterator<Item = Disposer>) -> Self {
		let children: Vec<Disposer> = children.into_iter().collect();
		Self::new(move || {
			for (index, mut child) in children.into_iter().enumerate().rev() {
				if let Err(payload) = catch_unwind(AssertUnwindSafe(|| child.dispose())) {
					tracing::warn!(index, message = %panic_message(payload.as_ref()), "disposer panicked during teardown");
				}
			}
		})
	}

	pub fn dispose(&mut self) {
		if let Some(action) = self.action.take() {
			action();
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.action.is_none()
	}
}

impl Default for Disposer {
	fn default() -> Self {
		Self::noop()
	}
}

impl fmt::Debug for Disposer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Disposer").field("disposed", &self.is_disposed()).finish()
	}
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
