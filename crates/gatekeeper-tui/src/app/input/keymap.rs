/*!
Key mapping for the TUI.

This module translates low-level KeyEvent inputs into high-level Actions that
the App can handle in a mode-agnostic way. This keeps `App::on_key_event`
simple and makes keybindings testable.

Intended usage:
- Call `to_action(mode, key)` from the App input loop.
- Match on `Action` in a single handler to update UI state or dispatch
  `StateCommand`s.
*/

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::types::Mode;

/// High-level, mode-agnostic actions produced by the keymap.
/// App translates these into UI updates and StateCommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // App lifecycle
    Quit,
    // Mode changes
    SwitchMode(Mode),

    // Text entry
    InsertChar(char),
    Backspace,
    Submit, // Enter in Insert mode

    // Scrolling
    ScrollLineUp,
    ScrollLineDown,
    PageUp,
    PageDown,
    JumpBottom,    // 'G'
    GotoSequenceG, // 'g' (first press; App decides if this becomes 'gg')
}

/// Keybinding descriptions surfaced by `/help`, in evaluation order.
pub const KEYBINDS: &[(&str, &str)] = &[
    ("enter", "submit whatever is in the input field"),
    ("ctrl+c", "quit the application"),
    ("esc", "enter normal mode from insert mode"),
    ("i", "enter insert mode from normal mode"),
    ("q", "quit (normal mode)"),
    ("j/k", "scroll down/up one line (normal mode)"),
    ("J/K", "scroll down/up half a page (normal mode)"),
    ("G", "go to bottom (normal mode)"),
    ("gg", "go to top (normal mode)"),
];

/// Map a KeyEvent to an Action based on the current editing Mode.
/// Evaluated in order, first match wins; returns None for unmapped keys.
pub fn to_action(mode: Mode, key: KeyEvent) -> Option<Action> {
    // Global bindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Insert => match (key.modifiers, key.code) {
            (m, KeyCode::Esc) if m.is_empty() => Some(Action::SwitchMode(Mode::Normal)),
            (m, KeyCode::Enter) if m.is_empty() || m == KeyModifiers::SHIFT => Some(Action::Submit),
            (m, KeyCode::Backspace) if m.is_empty() || m == KeyModifiers::SHIFT => {
                Some(Action::Backspace)
            }
            (m, KeyCode::Char(c)) if m.is_empty() || m == KeyModifiers::SHIFT => {
                Some(Action::InsertChar(c))
            }
            _ => None,
        },
        Mode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('i') => Some(Action::SwitchMode(Mode::Insert)),

            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollLineUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollLineDown),

            KeyCode::Char('J') | KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Char('K') | KeyCode::PageUp => Some(Action::PageUp),

            KeyCode::Char('g') => Some(Action::GotoSequenceG),
            KeyCode::Char('G') => Some(Action::JumpBottom),

            _ => None,
        },
    }
}
