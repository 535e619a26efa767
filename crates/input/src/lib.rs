//! Terminal input module (core-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events to the four directional intents and keeps the held-key snapshot the
//! core reads once per tick, including for terminals without key-release events.

pub mod handler;
pub mod map;

pub use puyo_types as types;

pub use handler::IntentTracker;
pub use map::{intent_for_key, is_pause, should_quit, IntentKey};
