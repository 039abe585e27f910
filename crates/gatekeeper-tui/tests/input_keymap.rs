use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use gatekeeper_tui::app::input::keymap::{to_action, Action, KEYBINDS};
use gatekeeper_tui::app::types::Mode;

#[test]
fn insert_char_maps_to_action() {
    let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    let act = to_action(Mode::Insert, key);
    assert!(matches!(act, Some(Action::InsertChar('x'))));
}

#[test]
fn slash_prefix_is_a_plain_char() {
    let key = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE);
    let act = to_action(Mode::Insert, key);
    // Commands are parsed at submit time; the keymap only emits the char.
    assert!(matches!(act, Some(Action::InsertChar('/'))));
}

#[test]
fn enter_submits_in_insert_mode() {
    let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
    let act = to_action(Mode::Insert, key);
    assert!(matches!(act, Some(Action::Submit)));
}

#[test]
fn esc_enters_normal_mode() {
    let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    let act = to_action(Mode::Insert, key);
    assert!(matches!(act, Some(Action::SwitchMode(Mode::Normal))));
}

#[test]
fn esc_in_normal_mode_is_unmapped() {
    // "escape" while already in Normal mode must be a no-op.
    let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(to_action(Mode::Normal, key), None);
}

#[test]
fn i_enters_insert_mode_from_normal() {
    let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
    let act = to_action(Mode::Normal, key);
    assert!(matches!(act, Some(Action::SwitchMode(Mode::Insert))));
}

#[test]
fn i_in_insert_mode_is_text_entry() {
    let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
    let act = to_action(Mode::Insert, key);
    assert!(matches!(act, Some(Action::InsertChar('i'))));
}

#[test]
fn ctrl_c_quits_in_any_mode() {
    let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(to_action(Mode::Insert, key), Some(Action::Quit));
    assert_eq!(to_action(Mode::Normal, key), Some(Action::Quit));
}

#[test]
fn normal_mode_scroll_keys() {
    let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
    let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
    let page_down = KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT);
    let bottom = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
    assert_eq!(to_action(Mode::Normal, j), Some(Action::ScrollLineDown));
    assert_eq!(to_action(Mode::Normal, k), Some(Action::ScrollLineUp));
    assert_eq!(to_action(Mode::Normal, page_down), Some(Action::PageDown));
    assert_eq!(to_action(Mode::Normal, bottom), Some(Action::JumpBottom));
}

#[test]
fn scroll_keys_do_not_leak_into_insert_mode() {
    // Exactly one sub-widget receives a given key, selected by mode.
    let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
    assert_eq!(to_action(Mode::Insert, j), Some(Action::InsertChar('j')));
}

#[test]
fn keybind_descriptions_are_unique() {
    let mut keys: Vec<&str> = KEYBINDS.iter().map(|(key, _)| *key).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), KEYBINDS.len());
}
