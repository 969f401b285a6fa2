/// Spawns a dedicated named OS thread for one command execution.
pub(crate) fn spawn_named_thread<F, R>(command_id: &str, f: F) -> std::io::Result<std::thread::JoinHandle<R>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(command_id, "worker.spawn_named_thread");
	std::thread::Builder::new().name(format!("actuate-command:{command_id}")).spawn(f)
}
