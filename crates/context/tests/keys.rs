use std::sync::Arc;

use actuate_context::{ChangeSet, Context, ContextError, ContextKey, ContextKeyCatalog};
use actuate_expr::{Expr, Value};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

#[test]
fn keys_read_defaults_until_set() {
	let ctx = Context::new();
	let count = ContextKey::new("selection_count", 0, "Number of selected items");
	assert_eq!(count.get(&ctx), Value::Int(0));
	count.set(&ctx, 4);
	assert_eq!(count.get(&ctx), Value::Int(4));
	assert_eq!(count.description(), "Number of selected items");
}

#[test]
fn keys_compose_into_guards() {
	let count = ContextKey::new("selection_count", 0, "");
	let editable = ContextKey::new("editable", true, "");
	let when = Expr::from(&count).greater(0) & editable.expr();
	assert_eq!(when.to_string(), "selection_count > 0 and editable");

	let ctx = Context::with_values([("selection_count", Value::Int(2)), ("editable", Value::Bool(true))]);
	assert_eq!(ctx.evaluate(when), Ok(Value::Bool(true)));
}

#[test]
fn catalog_rejects_conflicting_declarations() {
	let catalog = ContextKeyCatalog::new();
	let key = ContextKey::new("mode", "normal", "Current editing mode");
	catalog.declare(key.clone()).unwrap();
	assert_eq!(catalog.declare(key.clone()), Ok(key));
	assert_eq!(
		catalog.declare(ContextKey::new("mode", "insert", "Current editing mode")),
		Err(ContextError::DuplicateKey("mode".into()))
	);
	assert_eq!(catalog.len(), 1);
	assert!(catalog.get("mode").is_some());
}

#[test]
fn catalog_seeds_defaults_in_one_event() {
	let catalog = ContextKeyCatalog::new();
	catalog.declare(ContextKey::new("a", 1, "")).unwrap();
	catalog.declare(ContextKey::new("b", false, "")).unwrap();

	let ctx = Context::with_values([("a", Value::Int(9))]);
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = events.clone();
	ctx.subscribe(move |keys: &ChangeSet| sink.lock().push(keys.clone()));

	catalog.seed(&ctx);

	assert_eq!(ctx.get("a"), Some(Value::Int(9)));
	assert_eq!(ctx.get("b"), Some(Value::Bool(false)));
	assert_eq!(*events.lock(), vec![ChangeSet::from(["b".to_owned()])]);
	assert_eq!(
		catalog.keys().iter().map(ContextKey::name).collect::<Vec<_>>(),
		["a", "b"]
	);
}
