use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use actuate_expr::Value;
use tokio::sync::oneshot;

use crate::CommandError;

pub type CommandResult = Result<Value, CommandError>;

/// The deferred outcome of [`CommandsRegistry::execute`](crate::CommandsRegistry::execute).
///
/// Synchronous executions are ready on return. Asynchronous ones resolve when
/// the worker finishes; dropping an unresolved future abandons the result
/// without cancelling the command. The future can be awaited, or
/// [`CommandFuture::result`] blocks for it.
pub struct CommandFuture {
	command_id: String,
	state: State,
}

enum State {
	Ready(Option<CommandResult>),
	Pending(oneshot::Receiver<CommandResult>),
}

impl CommandFuture {
	pub(crate) fn ready(command_id: impl Into<String>, result: CommandResult) -> Self {
		Self {
			command_id: command_id.into(),
			state: State::Ready(Some(result)),
		}
	}

	pub(crate) fn pending(command_id: impl Into<String>, receiver: oneshot::Receiver<CommandResult>) -> Self {
		Self {
			command_id: command_id.into(),
			state: State::Pending(receiver),
		}
	}

	pub fn command_id(&self) -> &str {
		&self.command_id
	}

	/// `false` only while an asynchronous execution is still running.
	pub fn is_ready(&self) -> bool {
		match &self.state {
			State::Ready(_) => true,
			State::Pending(receiver) => !receiver.is_empty() || receiver.is_terminated(),
		}
	}

	/// Blocks until the command finishes and returns its outcome, re-raising
	/// the error the callback produced.
	///
	/// Must not be called from within an async runtime; `.await` the future
	/// there instead.
	///
	/// # Errors
	///
	/// The callback's error, [`CommandError::Panicked`] if it panicked, or
	/// [`CommandError::Abandoned`] if the worker went away.
	pub fn result(self) -> CommandResult {
		match self.state {
			State::Ready(Some(result)) => result,
			State::Ready(None) => Err(CommandError::Abandoned(self.command_id)),
			State::Pending(receiver) => receiver
				.blocking_recv()
				.unwrap_or_else(|_| Err(CommandError::Abandoned(self.command_id))),
		}
	}
}

impl Future for CommandFuture {
	type Output = CommandResult;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();
		match &mut this.state {
			State::Ready(result) => Poll::Ready(
				result
					.take()
					.unwrap_or_else(|| Err(CommandError::Abandoned(this.command_id.clone()))),
			),
			State::Pending(receiver) => Pin::new(receiver)
				.poll(cx)
				.map(|received| received.unwrap_or_else(|_| Err(CommandError::Abandoned(this.command_id.clone())))),
		}
	}
}

impl fmt::Debug for CommandFuture {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandFuture")
			.field("command_id", &self.command_id)
			.field("ready", &self.is_ready())
			.finish()
	}
}
