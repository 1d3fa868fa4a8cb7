//! Keyboard shortcuts of the terminal front-end.
//!
//! Single source for both key dispatch and the hint line.

use crossterm::event::KeyCode;

use crate::surface::Action;
use crate::wizard::NavKey;

/// What a key press asks for, before wizard state is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Arrow navigation, subject to the key-navigation options
    Arrow(NavKey),
    /// A specific action control
    Press(Action),
    /// Whichever of Next/Finish is currently usable
    Primary,
    /// Click the step row at this zero-based position
    JumpTo(usize),
}

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    pub alt_key: Option<KeyCode>,
    /// Display override for key ranges
    pub key_label: Option<&'static str>,
    pub description: &'static str,
}

impl Shortcut {
    /// Format key for display (e.g., "q", "←/→")
    pub fn key_display(&self) -> String {
        if let Some(label) = self.key_label {
            return label.to_string();
        }
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Shortcuts shown in the hint line, in display order.
pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        key: KeyCode::Left,
        alt_key: Some(KeyCode::Right),
        key_label: None,
        description: "Previous / next step",
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        key_label: None,
        description: "Next or finish",
    },
    Shortcut {
        key: KeyCode::Char('1'),
        alt_key: Some(KeyCode::Char('9')),
        key_label: Some("1-9"),
        description: "Jump to step",
    },
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: Some(KeyCode::Esc),
        key_label: None,
        description: "Quit",
    },
];

/// Map a key press to its action.
pub fn action_for(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Left => Some(KeyAction::Arrow(NavKey::Left)),
        KeyCode::Right => Some(KeyAction::Arrow(NavKey::Right)),
        KeyCode::Enter => Some(KeyAction::Primary),
        KeyCode::Char('p') => Some(KeyAction::Press(Action::Previous)),
        KeyCode::Char('n') => Some(KeyAction::Press(Action::Next)),
        KeyCode::Char('f') => Some(KeyAction::Press(Action::Finish)),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|d| KeyAction::JumpTo(d as usize - 1)),
        _ => None,
    }
}

/// One-line summary of every shortcut.
pub fn hint_line() -> String {
    SHORTCUTS
        .iter()
        .map(|s| format!("{} {}", s.key_display(), s.description))
        .collect::<Vec<_>>()
        .join("  ·  ")
}
