//! Key encoding for actuate.
//!
//! Provides:
//! - [`KeyCode`]: physical keys with canonical names
//! - [`KeyMod`], [`KeyCombo`], [`KeyChord`]: the packed integer form
//! - [`SimpleKeyBinding`], [`KeyBinding`]: platform-resolved presses and chords
//! - A shortcut string parser (`"Ctrl+Shift+P"`, `"Cmd+K Cmd+W"`)
//! - [`StandardKeyBinding`]: common shortcuts resolved per platform

mod binding;
mod code;
mod combo;
mod error;
pub mod parser;
mod platform;
mod standard;

pub use binding::{KeyBinding, KeyBindingSource, SimpleKeyBinding};
pub use code::KeyCode;
pub use combo::{KEY_CODE_MASK, KeyChord, KeyCombo, KeyMod, PART_MASK, split_parts};
pub use error::KeyError;
pub use platform::OperatingSystem;
pub use standard::{StandardCodes, StandardKeyBinding};
