//! Key mapping from terminal events to directional intents.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One of the four intents the core reads each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKey {
    Left,
    Right,
    Rotate,
    FastDrop,
}

impl IntentKey {
    pub const ALL: [IntentKey; 4] = [
        IntentKey::Left,
        IntentKey::Right,
        IntentKey::Rotate,
        IntentKey::FastDrop,
    ];

    pub(crate) fn slot(self) -> usize {
        match self {
            IntentKey::Left => 0,
            IntentKey::Right => 1,
            IntentKey::Rotate => 2,
            IntentKey::FastDrop => 3,
        }
    }
}

/// Map a key to the intent it drives: arrows, `hjkl` or `wasd`.
pub fn intent_for_key(code: KeyCode) -> Option<IntentKey> {
    match code {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(IntentKey::Left),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(IntentKey::Right),
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(IntentKey::Rotate),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(IntentKey::FastDrop),
        _ => None,
    }
}

pub fn is_pause(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('p' | 'P'))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
