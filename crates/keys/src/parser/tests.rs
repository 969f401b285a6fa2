use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[rstest]
#[case("a", SimpleKeyBinding::new(KeyCode::KeyA))]
#[case("Ctrl+A", SimpleKeyBinding::new(KeyCode::KeyA).ctrl())]
#[case("ctrl-shift-p", SimpleKeyBinding::new(KeyCode::KeyP).ctrl().shift())]
#[case("Cmd+Alt+Left", SimpleKeyBinding::new(KeyCode::LeftArrow).meta().alt())]
#[case("win+f5", SimpleKeyBinding::new(KeyCode::F5).meta())]
#[case("SHIFT+ENTER", SimpleKeyBinding::new(KeyCode::Enter).shift())]
#[case("ctrl+-", SimpleKeyBinding::new(KeyCode::Minus).ctrl())]
#[case("ctrl--", SimpleKeyBinding::new(KeyCode::Minus).ctrl())]
#[case("-", SimpleKeyBinding::new(KeyCode::Minus))]
#[case("ctrl+=", SimpleKeyBinding::new(KeyCode::Equal).ctrl())]
#[case("Ctrl+Shift", SimpleKeyBinding::new(KeyCode::Shift).ctrl())]
fn parses_single_parts(#[case] input: &str, #[case] expected: SimpleKeyBinding) {
	assert_eq!(parse_part(input), Ok(expected));
}

#[rstest]
#[case("", KeyError::Empty)]
#[case("   ", KeyError::Empty)]
#[case("ctrl+", KeyError::MissingKey)]
#[case("hyper+a", KeyError::UnknownModifier("hyper".into()))]
#[case("ctrl+nope", KeyError::UnknownKey("nope".into()))]
#[case("a+b", KeyError::UnknownModifier("a".into()))]
#[case("ctrl++a", KeyError::UnknownToken("+".into()))]
fn rejects_invalid_parts(#[case] input: &str, #[case] expected: KeyError) {
	assert_eq!(parse_part(input), Err(expected));
}

#[test]
fn parses_chords_separated_by_space() {
	let binding = parse("Cmd+K Cmd+W").unwrap();
	assert!(binding.is_chord());
	assert_eq!(
		binding.parts(),
		&[
			SimpleKeyBinding::new(KeyCode::KeyK).meta(),
			SimpleKeyBinding::new(KeyCode::KeyW).meta(),
		]
	);
}

#[test]
fn chord_error_points_at_bad_part() {
	assert_eq!(parse("ctrl+k ctrl+nope"), Err(KeyError::UnknownKey("nope".into())));
	assert_eq!(parse(""), Err(KeyError::Empty));
}

#[test]
fn display_is_reparseable() {
	for text in ["Ctrl+Shift+Alt+Meta+F12", "Ctrl+K Ctrl+S", "Shift+/", "Alt+Numpad7"] {
		let binding = parse(text).unwrap();
		assert_eq!(binding.to_string(), text);
		assert_eq!(parse(&binding.to_string()).unwrap(), binding);
	}
}
