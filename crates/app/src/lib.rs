//! Application layer for actuate.
//!
//! An [`Application`] owns one commands, menus and keybindings registry, an
//! argument provider store and a context store, all configured from a
//! [`ModelConfig`]. [`Applications`] keeps applications by name.

mod application;
mod applications;
pub mod config;
mod error;
pub mod logging;

pub use application::Application;
pub use applications::Applications;
pub use config::ModelConfig;
pub use error::{ApplicationError, ConfigError};
