//! Variable sources an expression can be evaluated against.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::Value;

/// A read-only mapping from variable names to values.
pub trait Namespace {
	fn lookup(&self, name: &str) -> Option<Value>;

	fn contains(&self, name: &str) -> bool {
		self.lookup(name).is_some()
	}
}

impl<S: BuildHasher> Namespace for HashMap<String, Value, S> {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}

	fn contains(&self, name: &str) -> bool {
		self.contains_key(name)
	}
}

impl Namespace for BTreeMap<String, Value> {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}

	fn contains(&self, name: &str) -> bool {
		self.contains_key(name)
	}
}

impl<S: BuildHasher> Namespace for IndexMap<String, Value, S> {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.get(name).cloned()
	}

	fn contains(&self, name: &str) -> bool {
		self.contains_key(name)
	}
}

impl Namespace for [(&str, Value)] {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.iter().find(|(key, _)| *key == name).map(|(_, value)| value.clone())
	}
}

impl<const N: usize> Namespace for [(&str, Value); N] {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.as_slice().lookup(name)
	}
}

impl<T: Namespace + ?Sized> Namespace for &T {
	fn lookup(&self, name: &str) -> Option<Value> {
		(**self).lookup(name)
	}

	fn contains(&self, name: &str) -> bool {
		(**self).contains(name)
	}
}

/// `overrides` layered over `base`; override entries win on collision.
pub struct Layered<'a, B: ?Sized> {
	pub overrides: &'a [(&'a str, Value)],
	pub base: &'a B,
}

impl<B: Namespace + ?Sized> Namespace for Layered<'_, B> {
	fn lookup(&self, name: &str) -> Option<Value> {
		self.overrides.lookup(name).or_else(|| self.base.lookup(name))
	}
}

/// The empty namespace.
pub struct Empty;

impl Namespace for Empty {
	fn lookup(&self, _name: &str) -> Option<Value> {
		None
	}
}
