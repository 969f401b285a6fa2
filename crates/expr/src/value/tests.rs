use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[rstest]
#[case(Value::None, false)]
#[case(Value::Bool(false), false)]
#[case(Value::Int(0), false)]
#[case(Value::Float(0.0), false)]
#[case(Value::str(""), false)]
#[case(Value::tuple([]), false)]
#[case(Value::Bool(true), true)]
#[case(Value::Int(-3), true)]
#[case(Value::str("x"), true)]
#[case(Value::list([Value::None]), true)]
fn truthiness(#[case] value: Value, #[case] expected: bool) {
	assert_eq!(value.is_truthy(), expected);
}

#[test]
fn numbers_compare_across_types() {
	assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
	assert!(Value::Bool(true).loose_eq(&Value::Int(1)));
	assert!(!Value::Int(1).loose_eq(&Value::str("1")));
	assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn sets_ignore_order_and_duplicates() {
	let a = Value::set([Value::Int(1), Value::Int(2), Value::Int(1)]);
	let b = Value::set([Value::Int(2), Value::Int(1)]);
	assert_eq!(a.to_string(), "{1, 2}");
	assert!(a.loose_eq(&b));
}

#[test]
fn sequences_order_lexicographically() {
	let short = Value::tuple([Value::Int(1), Value::Int(2)]);
	let long = Value::tuple([Value::Int(1), Value::Int(2), Value::Int(0)]);
	assert_eq!(short.loose_cmp(&long, "<"), Ok(Some(Ordering::Less)));
	assert_eq!(Value::str("b").loose_cmp(&Value::str("a"), "<"), Ok(Some(Ordering::Greater)));
}

#[test]
fn unorderable_types_are_type_errors() {
	let err = Value::Int(1).loose_cmp(&Value::str("a"), "<").unwrap_err();
	assert_eq!(
		err,
		EvalError::Type("'<' not supported between instances of 'int' and 'str'".into())
	);
	assert!(Value::set([]).loose_cmp(&Value::set([]), "<").is_err());
}

#[test]
fn nan_is_unordered() {
	assert_eq!(Value::Float(f64::NAN).loose_cmp(&Value::Int(1), "<"), Ok(None));
	assert!(!Value::Float(f64::NAN).loose_eq(&Value::Float(f64::NAN)));
}

#[test]
fn membership() {
	assert_eq!(Value::str("hello").contains(&Value::str("ell")), Ok(true));
	assert_eq!(Value::bytes(&b"abc"[..]).contains(&Value::Int(98)), Ok(true));
	assert_eq!(Value::list([Value::Int(1), Value::Float(2.0)]).contains(&Value::Int(2)), Ok(true));
	assert!(Value::str("abc").contains(&Value::Int(1)).is_err());
	assert!(Value::Int(3).contains(&Value::Int(1)).is_err());
}

#[rstest]
#[case(Value::None, "None")]
#[case(Value::Bool(true), "True")]
#[case(Value::Float(1.0), "1.0")]
#[case(Value::Float(f64::INFINITY), "1e309")]
#[case(Value::str("it's"), "\"it's\"")]
#[case(Value::str("a\nb"), "'a\\nb'")]
#[case(Value::bytes(&b"\x00a"[..]), "b'\\x00a'")]
#[case(Value::tuple([Value::Int(1)]), "(1,)")]
#[case(Value::set([]), "set()")]
fn display_uses_literal_syntax(#[case] value: Value, #[case] expected: &str) {
	assert_eq!(value.to_string(), expected);
}

#[rstest]
#[case(Value::Int(9_007_199_254_740_993), Value::Float(9_007_199_254_740_992.0), Some(Ordering::Greater))]
#[case(Value::Int(i64::MAX), Value::Float(9_223_372_036_854_775_808.0), Some(Ordering::Less))]
#[case(Value::Int(i64::MIN), Value::Float(-9_223_372_036_854_775_808.0), Some(Ordering::Equal))]
#[case(Value::Int(i64::MIN), Value::Float(f64::NEG_INFINITY), Some(Ordering::Greater))]
#[case(Value::Float(f64::INFINITY), Value::Int(i64::MAX), Some(Ordering::Greater))]
#[case(Value::Float(-2.5), Value::Int(-2), Some(Ordering::Less))]
#[case(Value::Float(-1.5), Value::Int(-2), Some(Ordering::Greater))]
#[case(Value::Bool(true), Value::Float(1.0), Some(Ordering::Equal))]
fn int_float_ordering_is_exact(#[case] left: Value, #[case] right: Value, #[case] expected: Option<Ordering>) {
	assert_eq!(left.loose_cmp(&right, "<"), Ok(expected));
}
