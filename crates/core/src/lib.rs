//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules and the frame-stepped simulation of the puzzle.
//! It has **no dependencies** on terminals, input devices or clocks:
//!
//! - **Deterministic**: the same seed and intent history replay the same game
//! - **Testable**: every rule is exercised by unit tests next to the code
//! - **Allocation-free ticks**: board lists are fixed-capacity
//!
//! # Module Structure
//!
//! - [`board`]: 6x12 grid with gravity compaction, flood-fill clears and the blink animation
//! - [`player`]: the active two-cell pair, its fall, moves and kick-resolved rotations
//! - [`game_state`]: the mode sequencer tying everything together
//! - [`scoring`]: chain, group-size and colour bonuses
//! - [`rng`]: seeded colour dealing
//! - [`config`]: tunable speeds and durations
//! - [`snapshot`]: the pixel-space scene handed to renderers
//!
//! # Example
//!
//! ```
//! use puyo_core::{Config, GameState};
//! use puyo_core::types::{GameMode, Intents};
//!
//! let mut game = GameState::new(Config::default(), 12345);
//! while game.mode() != GameMode::Playing {
//!     game.tick(Intents::NONE);
//! }
//! assert!(game.active().is_some());
//!
//! let drop = Intents { fast_drop: true, ..Intents::NONE };
//! while game.board().is_empty() {
//!     game.tick(drop);
//! }
//! assert_eq!(game.board().puyo_count(), 2);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod player;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use puyo_types as types;

pub use board::{Board, Cell, ClearResult, PlaceError, PlacedPuyo, Puyo, PuyoId};
pub use config::{Config, ConfigError};
pub use game_state::{GameEvent, GameState};
pub use player::{ActivePiece, FallOutcome, PlayAction};
pub use rng::{ColorDealer, SimpleRng};
pub use scoring::{score_for_clear, score_for_full_clear, score_for_soft_drop, Score};
pub use snapshot::{RenderPuyo, Scene, ZenkeshiView};
