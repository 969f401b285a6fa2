use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::{Empty, parse};

fn ns(entries: &[(&str, Value)]) -> HashMap<String, Value> {
	entries.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
}

fn eval(source: &str, namespace: &HashMap<String, Value>) -> Result<Value, EvalError> {
	parse(source).unwrap().eval(namespace)
}

#[test]
fn names_are_collected_bottom_up() {
	let expr = parse("a and (b + c > d or a) if flag else [e, 1]").unwrap();
	let names: Vec<&str> = expr.names().iter().map(|n| &**n).collect();
	assert_eq!(names, ["a", "b", "c", "d", "e", "flag"]);
	assert!(Expr::constant(1).names().is_empty());
}

#[test]
fn equality_is_structural() {
	let a = Expr::binary(Expr::name("x"), BinaryOp::Add, Expr::constant(1));
	let b = parse("x + 1").unwrap();
	assert_eq!(a, b);
	assert_ne!(a, parse("x + 1.0").unwrap());
	assert_ne!(Expr::constant(0.0), Expr::constant(-0.0));

	let set: std::collections::HashSet<Expr> = [a, b].into_iter().collect();
	assert_eq!(set.len(), 1);
}

#[test]
fn bool_op_normalizes_degenerate_lists() {
	assert_eq!(Expr::bool_op(BoolOp::And, []), Expr::constant(true));
	assert_eq!(Expr::bool_op(BoolOp::Or, []), Expr::constant(false));
	assert_eq!(Expr::bool_op(BoolOp::Or, [Expr::name("a")]), Expr::name("a"));
	assert_eq!(Expr::compare(Expr::name("a"), []), Expr::name("a"));
}

#[test]
fn bool_ops_short_circuit_and_return_operand() {
	let namespace = ns(&[("a", Value::Int(0)), ("b", Value::str("yes"))]);
	assert_eq!(eval("a and missing", &namespace), Ok(Value::Int(0)));
	assert_eq!(eval("b or missing", &namespace), Ok(Value::str("yes")));
	assert_eq!(eval("a or b", &namespace), Ok(Value::str("yes")));
}

#[test]
fn comparison_chains_stop_at_first_false_link() {
	let namespace = ns(&[("x", Value::Int(5))]);
	assert_eq!(eval("1 < x < 10", &namespace), Ok(Value::Bool(true)));
	assert_eq!(eval("1 < x < 3", &namespace), Ok(Value::Bool(false)));
	// the failing first link keeps the unorderable second link from running
	assert_eq!(eval("x < 1 < 'a'", &namespace), Ok(Value::Bool(false)));
	assert!(eval("x < 10 < 'a'", &namespace).is_err());
}

#[test]
fn conditional_only_evaluates_taken_branch() {
	let namespace = ns(&[("flag", Value::Bool(true))]);
	assert_eq!(eval("'on' if flag else missing", &namespace), Ok(Value::str("on")));
}

#[rstest]
#[case("7 // 2", Value::Int(3))]
#[case("-7 // 2", Value::Int(-4))]
#[case("-7 % 3", Value::Int(2))]
#[case("7 % -3", Value::Int(-2))]
#[case("7 / 2", Value::Float(3.5))]
#[case("2 ** 10", Value::Int(1024))]
#[case("2 ** -1", Value::Float(0.5))]
#[case("-2 ** 2", Value::Int(-4))]
#[case("1 << 4 | 1", Value::Int(17))]
#[case("~5", Value::Int(-6))]
#[case("True + True", Value::Int(2))]
#[case("True & False", Value::Bool(false))]
#[case("'ab' * 2", Value::str("abab"))]
#[case("[1] + [2]", Value::list([Value::Int(1), Value::Int(2)]))]
#[case("{1, 2} - {2}", Value::set([Value::Int(1)]))]
#[case("'b' in 'abc'", Value::Bool(true))]
#[case("3 not in (1, 2)", Value::Bool(true))]
#[case("1 == 1.0", Value::Bool(true))]
#[case("not []", Value::Bool(true))]
fn arithmetic_and_comparisons(#[case] source: &str, #[case] expected: Value) {
	assert_eq!(parse(source).unwrap().eval(&Empty), Ok(expected));
}

#[rstest]
#[case("1 / 0", EvalError::ZeroDivision)]
#[case("1 % 0", EvalError::ZeroDivision)]
#[case("9223372036854775807 + 1", EvalError::Overflow("+"))]
#[case("1 << -1", EvalError::Value("negative shift count".into()))]
#[case("'a' + 1", EvalError::Type("unsupported operand type(s) for +: 'str' and 'int'".into()))]
#[case("-'a'", EvalError::Type("bad operand type for unary -: 'str'".into()))]
fn evaluation_failures(#[case] source: &str, #[case] expected: EvalError) {
	assert_eq!(parse(source).unwrap().eval(&Empty), Err(expected));
}

#[test]
fn containers_evaluate_elements() {
	let namespace = ns(&[("a", Value::Int(1))]);
	assert_eq!(
		eval("(a, [a, 2], {a, a})", &namespace),
		Ok(Value::tuple([
			Value::Int(1),
			Value::list([Value::Int(1), Value::Int(2)]),
			Value::set([Value::Int(1)]),
		]))
	);
}
