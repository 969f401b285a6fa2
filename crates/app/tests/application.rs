//! Applications wiring configuration into their registries.

use actuate_app::{Application, ApplicationError, Applications, ModelConfig};
use actuate_expr::{Expr, Value, parse};
use actuate_keys::OperatingSystem;
use actuate_model::{Action, Callback, CommandArgs, CommandError, KeybindingRule, MenuRule, RegistryError};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn config(platform: OperatingSystem) -> ModelConfig {
	ModelConfig {
		platform: Some(platform),
		..ModelConfig::default()
	}
}

fn copy_action() -> Action {
	Action::new("edit.copy", "Copy", Callback::new(|_| Ok(Value::str("copied"))))
		.with_enablement(parse("has_selection").unwrap())
		.with_menu(MenuRule::new("editor/context").in_group("9_cutcopypaste"))
		.with_keybinding(KeybindingRule::new("Ctrl+C").with_mac("Cmd+C"))
}

#[rstest]
#[case(OperatingSystem::Linux, "Ctrl+C")]
#[case(OperatingSystem::MacOS, "Meta+C")]
fn configured_platform_resolves_keybindings(#[case] platform: OperatingSystem, #[case] expected: &str) {
	let app = Application::new("editor", config(platform));
	let _d = app.register_action(&copy_action()).unwrap();
	assert_eq!(
		app.keybindings().lookup("edit.copy").map(|kb| kb.to_string()),
		Some(expected.to_owned())
	);
}

#[test]
fn config_flags_reach_the_registries() {
	let config = ModelConfig::from_toml_str(
		r#"
		platform = "linux"
		raise_synchronous_exceptions = true
		palette_menu_id = "palette"
		reject_modifier_only_keybindings = true
		"#,
	)
	.unwrap();
	let app = Application::new("strict", config);
	assert!(app.commands().raises_synchronous_exceptions());
	assert_eq!(app.menus().palette_menu_id(), "palette");

	let modifier_only = Action::new("mods", "Mods", "app:mods").with_keybinding(KeybindingRule::new("Ctrl+Alt"));
	assert!(matches!(
		app.register_action(&modifier_only),
		Err(RegistryError::Validation { .. })
	));

	let failing = Action::new("fail", "Fail", Callback::new(|_| Err(CommandError::Failed("no".into()))));
	let _d = app.register_action(&failing).unwrap();
	assert_eq!(
		app.execute("fail", CommandArgs::new()).unwrap_err(),
		CommandError::Failed("no".into())
	);
}

#[test]
fn dispose_releases_every_registration() {
	let app = Application::new("editor", config(OperatingSystem::Linux));
	let actions = [
		copy_action(),
		Action::new("edit.paste", "Paste", "app.edit:paste").with_menu(MenuRule::new("editor/context")),
	];
	let _d = app.register_actions(&actions).unwrap();
	assert_eq!(app.registered(), 2);
	assert_eq!(app.commands().len(), 2);

	app.dispose();
	assert_eq!(app.registered(), 0);
	assert!(app.commands().is_empty());
	assert!(app.menus().menu_ids().is_empty());
	assert!(app.keybindings().is_empty());
}

#[test]
fn individual_disposers_untrack_their_registration() {
	let app = Application::new("editor", config(OperatingSystem::Linux));
	let mut copy = app.register_action(&copy_action()).unwrap();
	let _paste = app.register_action(&Action::new("edit.paste", "Paste", "app.edit:paste")).unwrap();

	copy.dispose();
	assert_eq!(app.registered(), 1);
	assert!(!app.commands().contains("edit.copy"));
	assert!(app.commands().contains("edit.paste"));
}

#[test]
fn register_actions_is_all_or_nothing() {
	let app = Application::new("editor", config(OperatingSystem::Linux));
	let actions = [copy_action(), Action::new("a", "A", "m:a"), copy_action()];
	assert_eq!(
		app.register_actions(&actions).unwrap_err(),
		RegistryError::Conflict("edit.copy".into())
	);
	assert_eq!(app.registered(), 0);
	assert!(app.commands().is_empty());
}

#[test]
fn enablement_and_menu_visibility_follow_the_context() {
	let app = Application::new("editor", config(OperatingSystem::Linux));
	let _d = app
		.register_actions(&[
			copy_action(),
			Action::new("edit.find", "Find", "app.edit:find")
				.with_menu(MenuRule::new("editor/context").in_group("navigation").with_when(Expr::name("searchable"))),
		])
		.unwrap();
	let (_, ctx) = app.contexts().create(None).unwrap();
	ctx.update([("has_selection", Value::Bool(false)), ("searchable", Value::Bool(true))]);

	assert_eq!(app.is_enabled("edit.copy", &ctx), Ok(false));
	assert_eq!(app.is_enabled("edit.find", &ctx), Ok(true));
	assert_eq!(app.is_enabled("missing", &ctx), Ok(false));

	let visible = app.visible_menu("editor/context", &ctx).unwrap();
	let names: Vec<Option<&str>> = visible.iter().map(|group| group.name.as_deref()).collect();
	assert_eq!(names, [Some("navigation"), Some("9_cutcopypaste")]);

	ctx.set("searchable", false);
	let visible = app.visible_menu("editor/context", &ctx).unwrap();
	assert_eq!(visible.len(), 1);
	assert_eq!(visible[0].entries[0].command_id(), Some("edit.copy"));
}

#[test]
fn injected_arguments_come_from_providers() {
	let app = Application::new("editor", config(OperatingSystem::Linux));
	app.providers().provide_value("path", "/tmp/notes.txt");
	let open = Action::new(
		"file.open",
		"Open",
		Callback::new(|args: CommandArgs| args.require("path").cloned()),
	);
	let _d = app.register_action(&open).unwrap();
	assert_eq!(
		app.execute("file.open", CommandArgs::new()).unwrap().result(),
		Ok(Value::str("/tmp/notes.txt"))
	);
}

#[test]
fn applications_are_looked_up_by_name() {
	let apps = Applications::new();
	let first = apps.get_or_create("viewer");
	let again = apps.get_or_create("viewer");
	assert!(std::sync::Arc::ptr_eq(&first, &again));
	assert_eq!(
		apps.create("viewer", ModelConfig::default()).unwrap_err(),
		ApplicationError::AlreadyExists("viewer".into())
	);
	apps.create("editor", config(OperatingSystem::Windows)).unwrap();
	assert_eq!(apps.names(), ["viewer", "editor"]);

	let _d = first.register_action(&Action::new("x", "X", "m:x")).unwrap();
	assert!(apps.destroy("viewer"));
	assert!(!apps.destroy("viewer"));
	assert!(first.commands().is_empty());
	assert!(apps.get("viewer").is_none());
}

#[test]
fn global_table_is_shared() {
	let name = "global-table-test";
	let app = Applications::global().get_or_create(name);
	assert!(Applications::global().get(name).is_some_and(|found| std::sync::Arc::ptr_eq(&found, &app)));
	assert!(Applications::global().destroy(name));
}
