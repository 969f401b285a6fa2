use std::collections::{BTreeMap, HashMap};

use actuate_expr::{Condition, Empty, EvalError, Expr, ExprError, MAX_REPEAT_LEN, Value, parse, safe_eval};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

fn ns<const N: usize>(entries: [(&str, Value); N]) -> HashMap<String, Value> {
	entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

#[test]
fn guard_evaluates_against_namespace() {
	let expr = parse("a and b > 1").unwrap();
	assert_eq!(expr.eval(&ns([("a", true.into()), ("b", 2.into())])), Ok(Value::Bool(true)));
	assert_eq!(expr.eval(&ns([("a", true.into()), ("b", 0.into())])), Ok(Value::Bool(false)));
}

#[test]
fn name_error_lists_every_missing_name() {
	let expr = parse("a and b > 1").unwrap();
	let err = expr.eval(&ns([("b", 2.into())])).unwrap_err();
	assert_eq!(
		err,
		EvalError::Name {
			missing: vec!["a".into()]
		}
	);
	assert!(err.to_string().contains('a'));

	// evaluation stops at `z`, the report still covers all absent names
	let err = parse("z or y or x").unwrap().eval(&Empty).unwrap_err();
	assert_eq!(
		err,
		EvalError::Name {
			missing: vec!["x".into(), "y".into(), "z".into()]
		}
	);
}

#[test]
fn overrides_win_over_namespace() {
	let expr = parse("mode == 'insert'").unwrap();
	let base = ns([("mode", "normal".into())]);
	assert_eq!(expr.eval(&base), Ok(Value::Bool(false)));
	assert_eq!(expr.eval_with(&base, &[("mode", "insert".into())]), Ok(Value::Bool(true)));
	assert_eq!(expr.eval_with(&Empty, &[("mode", "insert".into())]), Ok(Value::Bool(true)));
}

#[test]
fn any_map_type_is_a_namespace() {
	let expr = parse("x + 1").unwrap();
	let btree: BTreeMap<String, Value> = [("x".to_owned(), Value::Int(1))].into();
	let index: IndexMap<String, Value> = [("x".to_owned(), Value::Int(2))].into_iter().collect();
	assert_eq!(expr.eval(&btree), Ok(Value::Int(2)));
	assert_eq!(expr.eval(&index), Ok(Value::Int(3)));
	assert_eq!(expr.eval(&[("x", Value::Int(3))]), Ok(Value::Int(4)));
}

#[test]
fn parse_is_identity_on_expressions() {
	let expr = Expr::name("a");
	assert_eq!(parse(&expr).unwrap(), expr);
	assert_eq!(parse(expr.clone()).unwrap(), expr);
}

#[test]
fn safe_eval_passes_literals_through() {
	assert_eq!(safe_eval(true, &Empty), Ok(Value::Bool(true)));
	assert_eq!(safe_eval(false, &Empty), Ok(Value::Bool(false)));
	assert_eq!(safe_eval("1 + 1 == 2", &Empty), Ok(Value::Bool(true)));
	assert_eq!(safe_eval(Expr::name("x"), &ns([("x", 5.into())])), Ok(Value::Int(5)));
	assert_eq!(Condition::from("x"), Condition::Source("x".into()));
}

#[test]
fn syntax_and_name_errors_stay_distinct() {
	assert!(matches!(safe_eval("f(x)", &Empty), Err(ExprError::Syntax(_))));
	assert!(matches!(
		safe_eval("missing", &Empty),
		Err(ExprError::Eval(EvalError::Name { .. }))
	));
}

#[test]
fn logical_operators_compose_guards() {
	let focused = Expr::name("focused");
	let count = Expr::name("count");

	let when = focused.clone() & count.clone().greater(0) & !Expr::name("read_only");
	assert_eq!(when.to_string(), "focused and count > 0 and not read_only");
	assert_eq!(when, parse("focused and count > 0 and not read_only").unwrap());

	let either = focused.clone() | count.clone().equals(3);
	assert_eq!(either.to_string(), "focused or count == 3");

	let mixed = (focused.clone() | count.clone().less(1)) & Expr::name("visible");
	assert_eq!(mixed.to_string(), "(focused or count < 1) and visible");
}

#[test]
fn bitwise_and_arithmetic_builders() {
	let flags = Expr::name("flags");
	assert_eq!(flags.clone().bit_and(4).not_equals(0).to_string(), "flags & 4 != 0");
	assert_eq!(flags.clone().bit_or(1).bit_xor(2).to_string(), "(flags | 1) ^ 2");
	assert_eq!((-(flags.clone() + 1) * 2 % 7).to_string(), "-(flags + 1) * 2 % 7");
	assert_eq!(
		Expr::name("lang").contained_in(Expr::tuple([Expr::constant("rust"), Expr::constant("c")])).to_string(),
		"lang in ('rust', 'c')"
	);
	assert_eq!(Expr::name("x").not_contained_in(Expr::list([])).to_string(), "x not in []");
	assert_eq!(Expr::not(Expr::name("a")).to_string(), "not a");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Rule {
	when: Expr,
}

#[test]
fn serde_uses_canonical_text() {
	let rule = Rule {
		when: parse("a  and not b").unwrap(),
	};
	let text = toml::to_string(&rule).unwrap();
	assert_eq!(text.trim(), r#"when = "a and not b""#);
	assert_eq!(toml::from_str::<Rule>(&text).unwrap(), rule);
	assert!(toml::from_str::<Rule>(r#"when = "a.b""#).is_err());
}

fn eval(source: &str) -> Result<Value, EvalError> {
	parse(source).unwrap().eval(&Empty)
}

#[test]
fn sequences_repeat_by_integers() {
	assert_eq!(
		eval("[1, 2] * 2"),
		Ok(Value::list([1.into(), 2.into(), 1.into(), 2.into()]))
	);
	assert_eq!(eval("3 * (1,)"), Ok(Value::tuple([1.into(), 1.into(), 1.into()])));
	assert_eq!(eval("'ab' * 3"), Ok(Value::str("ababab")));
	assert_eq!(eval("b'x' * 2"), Ok(Value::bytes(&b"xx"[..])));
	assert_eq!(eval("[1] * -4"), Ok(Value::list([])));
	assert_eq!(eval("[] * 9223372036854775807"), Ok(Value::list([])));
}

#[test]
fn oversized_repetition_is_an_error() {
	assert_eq!(eval("'ab' * 9223372036854775807"), Err(EvalError::Overflow("*")));
	assert!(matches!(eval("'a' * 10 ** 12"), Err(EvalError::Value(_))));
	assert!(matches!(eval("[None] * 10 ** 12"), Err(EvalError::Value(_))));

	let at_limit = format!("'a' * {MAX_REPEAT_LEN}");
	assert!(matches!(eval(&at_limit), Ok(Value::Str(s)) if s.len() == MAX_REPEAT_LEN));
}

#[test]
fn ints_and_floats_compare_exactly() {
	assert_eq!(eval("9007199254740993 == 9007199254740992.0"), Ok(Value::Bool(false)));
	assert_eq!(eval("9007199254740992 == 9007199254740992.0"), Ok(Value::Bool(true)));
	assert_eq!(eval("9007199254740993 > 9007199254740992.0"), Ok(Value::Bool(true)));
	assert_eq!(eval("9223372036854775807 < 9223372036854775808.0"), Ok(Value::Bool(true)));
	assert_eq!(eval("-1 < -0.5 < 0"), Ok(Value::Bool(true)));
	assert_eq!(eval("2.5 > 2"), Ok(Value::Bool(true)));
}

#[test]
fn deeply_nested_text_is_a_syntax_error() {
	let source = format!("{}a{}", "(".repeat(3000), ")".repeat(3000));
	assert!(matches!(safe_eval(source.as_str(), &Empty), Err(ExprError::Syntax(_))));
}
