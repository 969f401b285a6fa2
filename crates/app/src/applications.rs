//! Applications looked up by name.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{Application, ApplicationError, ModelConfig};

/// A table of named applications with explicit create and destroy.
#[derive(Debug, Default)]
pub struct Applications {
	apps: RwLock<IndexMap<String, Arc<Application>>>,
}

impl Applications {
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide table.
	pub fn global() -> &'static Applications {
		static GLOBAL: OnceLock<Applications> = OnceLock::new();
		GLOBAL.get_or_init(Applications::new)
	}

	/// Creates `name` with `config`.
	///
	/// # Errors
	///
	/// [`ApplicationError::AlreadyExists`] if the name is taken.
	pub fn create(&self, name: &str, config: ModelConfig) -> Result<Arc<Application>, ApplicationError> {
		let mut apps = self.apps.write();
		if apps.contains_key(name) {
			return Err(ApplicationError::AlreadyExists(name.to_owned()));
		}
		let app = Arc::new(Application::new(name, config));
		apps.insert(name.to_owned(), app.clone());
		Ok(app)
	}

	/// The application called `name`, created with default config if absent.
	pub fn get_or_create(&self, name: &str) -> Arc<Application> {
		if let Some(app) = self.get(name) {
			return app;
		}
		self.apps
			.write()
			.entry(name.to_owned())
			.or_insert_with(|| Arc::new(Application::new(name, ModelConfig::default())))
			.clone()
	}

	pub fn get(&self, name: &str) -> Option<Arc<Application>> {
		self.apps.read().get(name).cloned()
	}

	/// Removes `name` and disposes its registrations. Returns `false` if no
	/// such application exists.
	pub fn destroy(&self, name: &str) -> bool {
		let removed = self.apps.write().shift_remove(name);
		match removed {
			Some(app) => {
				app.dispose();
				tracing::debug!(app = name, "destroyed application");
				true
			}
			None => false,
		}
	}

	pub fn names(&self) -> Vec<String> {
		self.apps.read().keys().cloned().collect()
	}
}
