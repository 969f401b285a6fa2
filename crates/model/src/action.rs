//! Fanning an [`Action`] out into the three registries.

use actuate_expr::Expr;

use crate::{Action, CommandsRegistry, Disposer, KeybindingRule, KeybindingsRegistry, MenusRegistry, RegistryError};

/// Registers `action`'s command, then its menu placements, then its
/// keybindings, and returns one disposer undoing all of them in reverse.
///
/// Each keybinding's `when` is ANDed with the action's enablement, so a
/// disabled command also loses its shortcut.
///
/// # Errors
///
/// [`RegistryError::InvalidAction`] or [`RegistryError::Conflict`] before any
/// registry is touched. A rejected keybinding fails with
/// [`RegistryError::Validation`] after the registrations made so far are
/// rolled back.
pub fn register_action(
	action: &Action,
	commands: &CommandsRegistry,
	menus: &MenusRegistry,
	keybindings: &KeybindingsRegistry,
) -> Result<Disposer, RegistryError> {
	action.validate()?;
	let id = action.id();
	let mut disposers = vec![commands.register(action.command.clone(), action.callback.clone())?];
	disposers.push(menus.append_action_menus(action));

	for rule in &action.keybindings {
		let rule = KeybindingRule {
			when: guard(rule.when.as_ref(), action.command.enablement.as_ref()),
			..rule.clone()
		};
		match keybindings.register(id, &rule) {
			Ok(Some(disposer)) => disposers.push(disposer),
			Ok(None) => {}
			Err(err) => {
				tracing::debug!(command_id = id, error = %err, "rolling back action registration");
				Disposer::chain(disposers).dispose();
				return Err(err);
			}
		}
	}

	tracing::debug!(command_id = id, menus = action.menus.len(), keybindings = disposers.len() - 2, "registered action");
	Ok(Disposer::chain(disposers))
}

fn guard(when: Option<&Expr>, enablement: Option<&Expr>) -> Option<Expr> {
	match (when, enablement) {
		(Some(when), Some(enablement)) => Some(when.clone() & enablement.clone()),
		(when, enablement) => when.or(enablement).cloned(),
	}
}
