//! Registries behind actuate's declarative actions.
//!
//! An [`Action`] bundles a command with its menu placements and keybindings.
//! [`register_action`] fans it out into a [`CommandsRegistry`], a
//! [`MenusRegistry`] and a [`KeybindingsRegistry`], returning a single
//! [`Disposer`] that reverses all three. Presentation layers query the
//! registries and subscribe to their change signals to re-render.

mod action;
pub mod commands;
mod disposer;
mod error;
pub mod injector;
pub mod keybindings;
pub mod menus;
mod types;
mod worker;

pub use action::register_action;
pub use commands::{CommandArgs, CommandFuture, CommandResult, CommandsRegistry, SymbolTable};
pub use disposer::Disposer;
pub use error::{CommandError, RegistryError, ResolutionError};
pub use injector::{Injector, Passthrough, ProviderStore};
pub use keybindings::{KeybindingsRegistry, RegisteredKeybinding, reject_modifier_only};
pub use menus::{MenuGroup, MenusRegistry};
pub use types::{
	Action, Callback, CommandFn, CommandRule, Icon, KeybindingRule, MenuEntry, MenuItem, MenuRule, SubmenuItem,
};
