//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Directives used when neither the caller nor `RUST_LOG` supplies any.
pub const DEFAULT_DIRECTIVES: &str = "actuate=info";

/// Installs a formatting subscriber filtered by `directives`, then
/// `RUST_LOG`, then [`DEFAULT_DIRECTIVES`].
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(directives: Option<&str>) -> bool {
	let filter = match directives {
		Some(directives) => EnvFilter::new(directives),
		None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)),
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init().is_ok()
}
