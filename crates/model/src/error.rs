use actuate_expr::ExprError;
use thiserror::Error;

/// Registration failures. These are always returned to the registering
/// caller before any side effect of the failed call takes place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// A command with this id is already registered.
	#[error("command '{0}' is already registered")]
	Conflict(String),
	/// A keybinding did not parse or was refused by the registry's filter.
	#[error("keybinding for '{command_id}' rejected: {reason}")]
	Validation { command_id: String, reason: String },
	/// A declarative action has a malformed field.
	#[error("invalid action '{id}': {reason}")]
	InvalidAction { id: String, reason: String },
}

/// A `"module.path:symbol"` callback reference that could not be turned into
/// a callable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
	#[error("malformed command reference '{0}', expected 'module.path:symbol'")]
	Malformed(String),
	#[error("cannot resolve '{reference}': no module named '{module}'")]
	UnknownModule { reference: String, module: String },
	#[error("cannot resolve '{reference}': module has no symbol '{symbol}'")]
	UnknownSymbol { reference: String, symbol: String },
	#[error("'{0}' does not resolve to a callable")]
	NotCallable(String),
}

/// Why running a command produced no value.
///
/// Callbacks return these directly; the registry adds the rest. Captured failures are cloned out of deferred results, so an error observed
/// through [`CommandFuture::result`](crate::CommandFuture::result) has the
/// same variant and message as the one the callback returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
	/// The callback reported failure.
	#[error("{0}")]
	Failed(String),
	/// [`CommandArgs::require`](crate::CommandArgs::require) found no such argument.
	#[error("missing argument: {0}")]
	MissingArgument(String),
	/// The callback rejected an argument's value.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// The worker thread could not be started.
	#[error("I/O error: {0}")]
	Io(String),
	/// No command is registered under the id.
	#[error("command not found: {0}")]
	NotFound(String),
	/// The callback reference could not be resolved.
	#[error(transparent)]
	Resolution(#[from] ResolutionError),
	/// An expression the callback evaluated failed to parse or evaluate.
	#[error(transparent)]
	Expr(#[from] ExprError),
	/// The callback panicked.
	#[error("command '{command_id}' panicked: {message}")]
	Panicked { command_id: String, message: String },
	/// The worker went away without delivering a result.
	#[error("command '{0}' finished without producing a result")]
	Abandoned(String),
}
