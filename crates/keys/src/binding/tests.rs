use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::{KeyChord, KeyCombo};

const ALL_OS: [OperatingSystem; 3] = [OperatingSystem::Windows, OperatingSystem::MacOS, OperatingSystem::Linux];

fn arb_os() -> impl Strategy<Value = OperatingSystem> {
	prop::sample::select(ALL_OS.to_vec())
}

fn arb_part() -> impl Strategy<Value = SimpleKeyBinding> {
	(prop::sample::select(KeyCode::ALL.to_vec()), any::<[bool; 4]>()).prop_map(|(key, [ctrl, shift, alt, meta])| SimpleKeyBinding {
		ctrl,
		shift,
		alt,
		meta,
		key,
	})
}

proptest! {
	#[test]
	fn packed_form_roundtrips(part in arb_part(), os in arb_os()) {
		let value = part.to_int(os);
		prop_assert_eq!(SimpleKeyBinding::from_int(value, os).unwrap(), part);
	}

	#[test]
	fn chord_roundtrip_keeps_part_order(first in arb_part(), second in arb_part(), os in arb_os()) {
		let binding = KeyBinding::new([first, second]).unwrap();
		let value = binding.to_int(os).unwrap();
		let decoded = KeyBinding::from_int(value, os).unwrap();
		prop_assert_eq!(decoded.parts(), &[first, second]);
	}

	#[test]
	fn text_form_roundtrips(first in arb_part(), second in arb_part()) {
		let binding = KeyBinding::new([first, second]).unwrap();
		prop_assert_eq!(binding.to_string().parse::<KeyBinding>().unwrap(), binding);
	}
}

#[test]
fn ctrl_cmd_resolves_per_platform() {
	let value = (KeyMod::CTRL_CMD | KeyCode::KeyS).bits();

	let mac = SimpleKeyBinding::from_int(value, OperatingSystem::MacOS).unwrap();
	assert_eq!(mac, SimpleKeyBinding::new(KeyCode::KeyS).meta());

	let win = SimpleKeyBinding::from_int(value, OperatingSystem::Windows).unwrap();
	assert_eq!(win, SimpleKeyBinding::new(KeyCode::KeyS).ctrl());
}

#[test]
fn win_ctrl_resolves_per_platform() {
	let value = (KeyMod::WIN_CTRL | KeyCode::KeyA).bits();
	assert!(SimpleKeyBinding::from_int(value, OperatingSystem::MacOS).unwrap().ctrl);
	assert!(SimpleKeyBinding::from_int(value, OperatingSystem::Linux).unwrap().meta);
}

#[test]
fn bit_layout_matches_packed_word() {
	let combo = KeyCombo::new(KeyMod::all(), KeyCode::KeyA);
	assert_eq!(combo.bits(), 0x0F00 | KeyCode::KeyA as u32);
	assert_eq!(combo.key(), Some(KeyCode::KeyA));
	assert_eq!(combo.mods(), KeyMod::all());

	let chord = KeyChord::new(KeyMod::CTRL_CMD | KeyCode::KeyK, KeyCode::KeyW);
	assert_eq!(chord.bits() & 0xFFFF, (KeyMod::CTRL_CMD | KeyCode::KeyK).bits());
	assert_eq!(chord.bits() >> 16, KeyCode::KeyW as u32);
	assert_eq!(chord.second().key(), Some(KeyCode::KeyW));
}

#[test]
fn zero_second_part_is_a_single_combo() {
	let binding = KeyBinding::from_int(KeyCode::Escape as u32, OperatingSystem::Linux).unwrap();
	assert!(!binding.is_chord());
	assert_eq!(binding.first().key, KeyCode::Escape);
}

#[test]
fn invalid_codes_are_rejected() {
	assert_eq!(KeyBinding::from_int(0, OperatingSystem::Linux), Err(KeyError::InvalidCode(0)));
	assert_eq!(SimpleKeyBinding::from_int(0xFF, OperatingSystem::Linux), Err(KeyError::InvalidCode(0xFF)));
}

#[test]
fn three_part_chords_cannot_be_packed() {
	let binding: KeyBinding = "a b c".parse().unwrap();
	assert_eq!(binding.to_int(OperatingSystem::Linux), Err(KeyError::ChordTooLong(3)));
}

#[test]
fn platform_display() {
	let binding: KeyBinding = "Ctrl+Shift+Meta+Up".parse().unwrap();
	assert_eq!(binding.display_for(OperatingSystem::MacOS), "⌃⇧⌘↑");
	assert_eq!(binding.display_for(OperatingSystem::Windows), "Ctrl+Shift+Win+Up");
	assert_eq!(binding.display_for(OperatingSystem::Linux), "Ctrl+Shift+Super+Up");
}

#[test]
fn modifier_only_detection() {
	assert!("Ctrl+Shift".parse::<KeyBinding>().unwrap().is_modifier_only());
	assert!(!"Ctrl+S".parse::<KeyBinding>().unwrap().is_modifier_only());
}

#[test]
fn sources_resolve_text_and_codes() {
	let os = OperatingSystem::Windows;
	let from_code = KeyBindingSource::from(KeyMod::CTRL_CMD | KeyCode::KeyS).resolve(os).unwrap();
	let from_text = KeyBindingSource::from("ctrl+s").resolve(os).unwrap();
	assert_eq!(from_code, from_text);
}

#[test]
fn standard_bindings_prefer_platform_override() {
	use crate::StandardKeyBinding;

	let redo_win = StandardKeyBinding::Redo.resolve(OperatingSystem::Windows).unwrap();
	assert_eq!(redo_win.to_string(), "Ctrl+Y");
	let redo_mac = StandardKeyBinding::Redo.resolve(OperatingSystem::MacOS).unwrap();
	assert_eq!(redo_mac.to_string(), "Shift+Meta+Z");
	for standard in StandardKeyBinding::ALL {
		assert!(standard.resolve(OperatingSystem::Linux).is_some(), "{standard:?}");
	}
}
