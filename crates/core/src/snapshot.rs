//! Renderable scene handed to the drawing layer once per tick.
//!
//! Everything here is in pixels (`cell_size` per grid cell) so a renderer can
//! interpolate falling cells, moves and rotations without knowing game rules.

use crate::board::PuyoId;
use crate::types::{GameMode, PuyoColor};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPuyo {
    pub id: PuyoId,
    pub color: PuyoColor,
    pub left: f32,
    pub top: f32,
    /// False during the hidden quarters of the erase blink.
    pub visible: bool,
}

/// Progress of the full-clear banner; both ratios run from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZenkeshiView {
    pub show_ratio: f32,
    pub hide_ratio: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub puyos: Vec<RenderPuyo>,
    pub score: u32,
    pub mode: GameMode,
    /// Chain count of the running drop sequence.
    pub chain: u32,
    pub frame: u32,
    pub episode: u32,
    pub cell_size: f32,
    pub batankyu_ratio: Option<f32>,
    pub zenkeshi: Option<ZenkeshiView>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            puyos: Vec::new(),
            score: 0,
            mode: GameMode::Start,
            chain: 0,
            frame: 0,
            episode: 0,
            cell_size: 0.0,
            batankyu_ratio: None,
            zenkeshi: None,
        }
    }
}

impl Scene {
    /// Reset to the default while keeping the puyo allocation.
    pub fn clear(&mut self) {
        self.puyos.clear();
        self.score = 0;
        self.mode = GameMode::Start;
        self.chain = 0;
        self.frame = 0;
        self.episode = 0;
        self.cell_size = 0.0;
        self.batankyu_ratio = None;
        self.zenkeshi = None;
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver | GameMode::Batankyu)
    }
}
