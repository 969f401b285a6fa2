//! Evented variable scopes used to evaluate `when` and `enablement` guards.
//!
//! - [`Context`]: a layered key-value store whose change events flow from
//!   parents to children.
//! - [`Signal`]: the listener list behind every change event in the model.
//! - [`ContextKey`] / [`ContextKeyCatalog`]: declared variables with defaults.
//! - [`ContextStore`]: handle-keyed association of owners to contexts.

mod context;
mod error;
mod key;
mod signal;
mod store;

pub use context::{BufferGuard, ChangeSet, Context};
pub use error::ContextError;
pub use key::{ContextKey, ContextKeyCatalog};
pub use signal::{Signal, SubscriptionId};
pub use store::{ContextHandle, ContextLease, ContextStore};
