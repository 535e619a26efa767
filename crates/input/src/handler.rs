//! Held-key tracker producing the per-tick [`Intents`] snapshot.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! a key counts as held until it is released or until no press/repeat for it
//! has arrived within the timeout.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{intent_for_key, IntentKey};
use crate::types::Intents;

// Long enough to bridge the gaps between auto-repeat events, short enough that a
// tap does not turn into several moves.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeyState {
    held: bool,
    /// Pressed since the last snapshot; a tap shorter than a tick still counts once.
    latched: bool,
    since_press_ms: u32,
}

#[derive(Debug, Clone)]
pub struct IntentTracker {
    keys: [KeyState; 4],
    key_release_timeout_ms: u32,
}

impl Default for IntentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentTracker {
    pub fn new() -> Self {
        Self {
            keys: [KeyState::default(); 4],
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn press(&mut self, key: IntentKey) {
        let state = &mut self.keys[key.slot()];
        state.held = true;
        state.latched = true;
        state.since_press_ms = 0;
    }

    pub fn release(&mut self, key: IntentKey) {
        self.keys[key.slot()].held = false;
    }

    pub fn is_held(&self, key: IntentKey) -> bool {
        self.keys[key.slot()].held
    }

    /// Feed a terminal key event. Returns the intent it touched, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<IntentKey> {
        let intent = intent_for_key(key.code)?;
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(intent),
            KeyEventKind::Release => self.release(intent),
        }
        Some(intent)
    }

    /// Age held keys by `elapsed_ms`, releasing those past the timeout.
    pub fn update(&mut self, elapsed_ms: u32) {
        let timeout = self.key_release_timeout_ms;
        for state in self.keys.iter_mut().filter(|s| s.held) {
            state.since_press_ms = state.since_press_ms.saturating_add(elapsed_ms);
            if state.since_press_ms > timeout {
                state.held = false;
            }
        }
    }

    /// Current intents. Clears the tap latches.
    pub fn snapshot(&mut self) -> Intents {
        let mut active = [false; 4];
        for (slot, state) in self.keys.iter_mut().enumerate() {
            active[slot] = state.held || state.latched;
            state.latched = false;
        }
        Intents {
            left: active[IntentKey::Left.slot()],
            right: active[IntentKey::Right.slot()],
            rotate: active[IntentKey::Rotate.slot()],
            fast_drop: active[IntentKey::FastDrop.slot()],
        }
    }

    /// Drop every held key and latch (used when pausing).
    pub fn reset(&mut self) {
        self.keys = [KeyState::default(); 4];
    }
}
