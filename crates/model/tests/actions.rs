//! End-to-end behaviour of action registration across the three registries.

use actuate_context::Context;
use actuate_expr::{Expr, Value, parse, safe_eval};
use actuate_keys::OperatingSystem;
use actuate_model::menus::COMMAND_PALETTE;
use actuate_model::{
	Action, Callback, CommandArgs, CommandError, CommandsRegistry, KeybindingRule, KeybindingsRegistry, MenuRule,
	MenusRegistry, RegistryError, register_action, reject_modifier_only,
};
use pretty_assertions::assert_eq;

struct Registries {
	commands: CommandsRegistry,
	menus: MenusRegistry,
	keybindings: KeybindingsRegistry,
}

impl Registries {
	fn new() -> Self {
		Self {
			commands: CommandsRegistry::new(),
			menus: MenusRegistry::new(),
			keybindings: KeybindingsRegistry::for_platform(OperatingSystem::Linux),
		}
	}

	fn register(&self, action: &Action) -> Result<actuate_model::Disposer, RegistryError> {
		register_action(action, &self.commands, &self.menus, &self.keybindings)
	}
}

fn save_action() -> Action {
	Action::new("file.save", "Save", Callback::new(|_| Ok(Value::Bool(true))))
		.with_category("File")
		.with_enablement(parse("dirty").unwrap())
		.with_menu(MenuRule::new("menubar/file").in_group("2_save").with_order(1.0))
		.with_keybinding(KeybindingRule::new("Ctrl+S").with_when(Expr::name("editor_focused")))
}

#[test]
fn dispose_removes_every_trace() {
	let registries = Registries::new();
	let mut disposer = registries.register(&save_action()).unwrap();

	assert!(registries.commands.contains("file.save"));
	assert_eq!(registries.menus.menu_ids(), ["menubar/file", COMMAND_PALETTE]);
	assert_eq!(registries.keybindings.len(), 1);

	disposer.dispose();
	disposer.dispose();

	assert!(registries.commands.is_empty());
	assert!(registries.menus.menu_ids().is_empty());
	assert!(registries.menus.iter_groups("menubar/file").is_empty());
	assert!(registries.keybindings.is_empty());
	assert_eq!(registries.keybindings.lookup("file.save"), None);
}

#[test]
fn duplicate_command_fails_before_any_side_effect() {
	let registries = Registries::new();
	let _first = registries.register(&save_action()).unwrap();
	let duplicate = Action::new("file.save", "Save Again", "app.file:save")
		.with_menu(MenuRule::new("toolbar"))
		.with_keybinding(KeybindingRule::new("Ctrl+Alt+S"));

	assert_eq!(
		registries.register(&duplicate).unwrap_err(),
		RegistryError::Conflict("file.save".into())
	);
	assert!(!registries.menus.contains("toolbar"));
	assert_eq!(registries.menus.get_menu(COMMAND_PALETTE).len(), 1);
	assert_eq!(registries.keybindings.len(), 1);
	assert_eq!(registries.commands.get("file.save").map(|rule| rule.title), Some("Save".to_owned()));
}

#[test]
fn keybinding_guard_includes_enablement() {
	let registries = Registries::new();
	let _d = registries.register(&save_action()).unwrap();
	let registered = &registries.keybindings.iter()[0];
	let when = registered.when.clone().unwrap();
	assert_eq!(when.to_string(), "editor_focused and dirty");

	let ctx = Context::with_values([("editor_focused", Value::Bool(true)), ("dirty", Value::Bool(false))]);
	assert_eq!(safe_eval(&when, &ctx), Ok(Value::Bool(false)));
	ctx.set("dirty", true);
	assert_eq!(safe_eval(&when, &ctx), Ok(Value::Bool(true)));
}

#[test]
fn rejected_keybinding_rolls_back_the_action() {
	let registries = Registries {
		keybindings: KeybindingsRegistry::for_platform(OperatingSystem::Linux).with_filter(reject_modifier_only),
		..Registries::new()
	};
	let action = Action::new("mods", "Modifiers", "app.keys:mods")
		.with_menu(MenuRule::new("keys"))
		.with_keybinding(KeybindingRule::new("Ctrl+Shift"));

	assert!(matches!(registries.register(&action), Err(RegistryError::Validation { .. })));
	assert!(registries.commands.is_empty());
	assert!(registries.menus.menu_ids().is_empty());
	assert!(registries.keybindings.is_empty());

	// the id is free again
	assert!(registries.register(&Action::new("mods", "Modifiers", "app.keys:mods")).is_ok());
}

#[test]
fn malformed_actions_are_refused() {
	let registries = Registries::new();
	let bad_order = Action::new("x", "X", "m:x").with_menu(MenuRule::new("menu").with_order(f64::NAN));
	assert!(matches!(
		registries.register(&bad_order),
		Err(RegistryError::InvalidAction { .. })
	));
	assert!(matches!(
		registries.register(&Action::new(" ", "Blank", "m:x")),
		Err(RegistryError::InvalidAction { .. })
	));
	assert!(registries.commands.is_empty());
}

#[test]
fn async_failure_matches_deferred_sync_failure() {
	let registries = Registries::new();
	let action = Action::new(
		"broken",
		"Broken",
		Callback::new(|args: CommandArgs| Err(CommandError::InvalidArgument(format!("{:?}", args.positional(0))))),
	);
	let _d = registries.register(&action).unwrap();

	let args = || CommandArgs::new().arg(3);
	let sync = registries.commands.execute("broken", args()).unwrap().result();
	let background = registries.commands.execute_async("broken", args()).unwrap().result();
	assert_eq!(sync, background);
	assert_eq!(sync.unwrap_err().to_string(), "invalid argument: Some(Int(3))");
}

#[test]
fn fail_fast_mode_surfaces_errors_at_the_call() {
	let registries = Registries::new();
	registries.commands.set_raise_synchronous_exceptions(true);
	let action = Action::new("broken", "Broken", Callback::new(|_| Err(CommandError::Failed("nope".into()))));
	let _d = registries.register(&action).unwrap();

	assert_eq!(
		registries.commands.execute("broken", CommandArgs::new()).unwrap_err(),
		CommandError::Failed("nope".into())
	);
	// background execution still defers
	let future = registries.commands.execute_async("broken", CommandArgs::new()).unwrap();
	assert_eq!(future.result(), Err(CommandError::Failed("nope".into())));
}

#[test]
fn hidden_actions_skip_the_palette() {
	let registries = Registries::new();
	let _d = registries
		.register(&Action::new("internal", "Internal", "app:internal").hidden_from_palette())
		.unwrap();
	assert!(!registries.menus.contains(COMMAND_PALETTE));
	assert!(registries.commands.contains("internal"));
}
