use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actuate_expr::{Empty, ExprError, Value, safe_eval};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::ProviderStore;

fn echo() -> Callback {
	Callback::new(|args: CommandArgs| Ok(args.positional(0).cloned().unwrap_or(Value::None)))
}

fn failing() -> Callback {
	Callback::new(|_| Err(CommandError::Failed("boom".into())))
}

#[test]
fn register_rejects_duplicates_and_keeps_the_first() {
	let registry = CommandsRegistry::new();
	registry.register(CommandRule::new("file.open", "Open"), echo()).unwrap();
	assert_eq!(
		registry.register(CommandRule::new("file.open", "Open Again"), failing()).unwrap_err(),
		RegistryError::Conflict("file.open".into())
	);
	assert_eq!(registry.get("file.open").map(|rule| rule.title), Some("Open".to_owned()));
	let out = registry.execute("file.open", CommandArgs::new().arg(7)).unwrap();
	assert_eq!(out.result(), Ok(Value::Int(7)));
}

#[test]
fn empty_id_is_rejected() {
	let registry = CommandsRegistry::new();
	assert!(matches!(
		registry.register(CommandRule::new("", "Nothing"), echo()),
		Err(RegistryError::InvalidAction { .. })
	));
}

#[test]
fn disposer_removes_only_its_own_registration() {
	let registry = CommandsRegistry::new();
	let mut first = registry.register(CommandRule::new("a", "A"), echo()).unwrap();
	first.dispose();
	assert!(!registry.contains("a"));

	let _second = registry.register(CommandRule::new("a", "A2"), echo()).unwrap();
	first.dispose();
	assert!(registry.contains("a"));
	assert_eq!(registry.len(), 1);
}

#[test]
fn registration_emits_in_order() {
	let registry = CommandsRegistry::new();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	registry.commands_registered().connect(move |id: &String| sink.lock().push(id.clone()));

	registry.register(CommandRule::new("b", "B"), echo()).unwrap();
	registry.register(CommandRule::new("a", "A"), echo()).unwrap();
	let _ = registry.register(CommandRule::new("a", "A"), echo());

	assert_eq!(*seen.lock(), ["b", "a"]);
	assert_eq!(registry.iter().into_iter().map(|rule| rule.id).collect::<Vec<_>>(), ["b", "a"]);
}

#[test]
fn unknown_command_fails_immediately() {
	let registry = CommandsRegistry::new();
	assert_eq!(
		registry.execute("nope", CommandArgs::new()).unwrap_err(),
		CommandError::NotFound("nope".into())
	);
	assert_eq!(
		registry.execute_async("nope", CommandArgs::new()).unwrap_err(),
		CommandError::NotFound("nope".into())
	);
}

#[test]
fn deferred_mode_holds_the_error_until_result() {
	let registry = CommandsRegistry::new();
	registry.register(CommandRule::new("bad", "Bad"), failing()).unwrap();
	let future = registry.execute("bad", CommandArgs::new()).unwrap();
	assert!(future.is_ready());
	assert_eq!(future.result(), Err(CommandError::Failed("boom".into())));
}

#[test]
fn fail_fast_mode_returns_the_error_directly() {
	let registry = CommandsRegistry::new();
	registry.set_raise_synchronous_exceptions(true);
	registry.register(CommandRule::new("bad", "Bad"), failing()).unwrap();
	assert_eq!(
		registry.execute("bad", CommandArgs::new()).unwrap_err(),
		CommandError::Failed("boom".into())
	);
}

#[test]
fn panics_are_captured() {
	let registry = CommandsRegistry::new();
	registry
		.register(CommandRule::new("panics", "Panics"), Callback::new(|_| panic!("exploded")))
		.unwrap();
	let result = registry.execute("panics", CommandArgs::new()).unwrap().result();
	assert_eq!(
		result,
		Err(CommandError::Panicked {
			command_id: "panics".into(),
			message: "exploded".into(),
		})
	);
}

#[test]
fn references_resolve_once_and_cache_the_outcome() {
	let symbols = SymbolTable::new();
	let registry = CommandsRegistry::with_symbols(symbols.clone());
	registry.register(CommandRule::new("late", "Late"), "plugins.late:run").unwrap();

	let missing = ResolutionError::UnknownModule {
		reference: "plugins.late:run".into(),
		module: "plugins.late".into(),
	};
	assert_eq!(
		registry.execute("late", CommandArgs::new()).unwrap_err(),
		CommandError::Resolution(missing.clone())
	);

	// defining it afterwards does not revive a failed resolution
	symbols.define("plugins.late:run", |_| Ok(Value::Bool(true))).unwrap();
	assert_eq!(
		registry.execute("late", CommandArgs::new()).unwrap_err(),
		CommandError::Resolution(missing)
	);
}

#[test]
fn successful_resolution_is_memoized() {
	let symbols = SymbolTable::new();
	symbols.define("app.cmds:first", |_| Ok(Value::Int(1))).unwrap();
	let registry = CommandsRegistry::with_symbols(symbols.clone());
	registry.register(CommandRule::new("cmd", "Cmd"), "app.cmds:first").unwrap();

	assert_eq!(registry.execute("cmd", CommandArgs::new()).unwrap().result(), Ok(Value::Int(1)));
	symbols.define("app.cmds:first", |_| Ok(Value::Int(2))).unwrap();
	assert_eq!(registry.execute("cmd", CommandArgs::new()).unwrap().result(), Ok(Value::Int(1)));
}

#[test]
fn async_execution_runs_off_thread() {
	let registry = CommandsRegistry::new();
	let caller = std::thread::current().id();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	registry
		.register(
			CommandRule::new("bg", "Background"),
			Callback::new(move |_| {
				counter.fetch_add(1, Ordering::SeqCst);
				Ok(Value::Bool(std::thread::current().id() != caller))
			}),
		)
		.unwrap();

	let future = registry.execute_async("bg", CommandArgs::new()).unwrap();
	assert_eq!(future.command_id(), "bg");
	assert_eq!(future.result(), Ok(Value::Bool(true)));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn injector_fills_missing_keywords() {
	let registry = CommandsRegistry::new();
	let providers = ProviderStore::new();
	providers.provide_value("path", "/tmp/default");
	providers.provide("absent", || None);
	registry.set_injector(Arc::new(providers));
	registry
		.register(
			CommandRule::new("open", "Open"),
			Callback::new(|args: CommandArgs| {
				assert!(args.get("absent").is_none());
				args.require("path").cloned()
			}),
		)
		.unwrap();

	let injected = registry.execute("open", CommandArgs::new()).unwrap().result();
	assert_eq!(injected, Ok(Value::str("/tmp/default")));
	let explicit = registry
		.execute("open", CommandArgs::new().kwarg("path", "/etc"))
		.unwrap()
		.result();
	assert_eq!(explicit, Ok(Value::str("/etc")));
}

#[test]
fn callback_expression_errors_propagate() {
	let registry = CommandsRegistry::new();
	registry
		.register(
			CommandRule::new("eval", "Evaluate"),
			Callback::new(|args: CommandArgs| {
				let source = args.require("source")?;
				let source = source.as_str().ok_or_else(|| CommandError::InvalidArgument(source.to_string()))?;
				Ok(safe_eval(source, &Empty)?)
			}),
		)
		.unwrap();

	let out = registry.execute("eval", CommandArgs::new().kwarg("source", "1 + 2")).unwrap();
	assert_eq!(out.result(), Ok(Value::Int(3)));

	let out = registry.execute("eval", CommandArgs::new().kwarg("source", "missing")).unwrap();
	assert!(matches!(out.result(), Err(CommandError::Expr(ExprError::Eval(_)))));

	let out = registry.execute("eval", CommandArgs::new().kwarg("source", 5)).unwrap();
	assert_eq!(out.result(), Err(CommandError::InvalidArgument("5".into())));
}
