//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal gameplay. It avoids widget toolkits and
//! renders the core's pixel-space [`core::Scene`] into a framebuffer that is then
//! flushed to the terminal with diffed redraws.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: scene → framebuffer (pure, unit-tested)
//! - [`renderer`]: framebuffer → terminal (raw mode, alternate screen, diffs)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use puyo_core as core;
pub use puyo_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, HudStatus, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
