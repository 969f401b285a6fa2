use thiserror::Error;

use crate::ContextHandle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
	#[error("context handle {0} is not live in this store")]
	UnknownHandle(ContextHandle),
	#[error("context key '{0}' is already declared differently")]
	DuplicateKey(String),
}
