//! Error types for the application layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or mapping it onto the config.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Errors from the process-wide application table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
	#[error("application '{0}' already exists")]
	AlreadyExists(String),
}
