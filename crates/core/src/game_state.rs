//! Game state module - the frame-stepped mode sequencer
//!
//! [`GameState`] owns everything one game needs (board, active pair, score,
//! chain counter, colour dealer, animation timers) and advances by exactly one
//! mode transition per [`GameState::tick`]:
//!
//! ```text
//! Start → CheckFall ⇄ Fall → CheckErase → Erasing → CheckFall …
//!                              └→ NewPuyo → Playing ⇄ Moving / Rotating
//!                                   │          └→ Fix → CheckFall
//!                                   └→ GameOver → Batankyu
//! ```
//!
//! Nothing reads a clock: every animation, including the full-clear banner, is
//! driven by the frame counter, so a seed plus an intent history replays a game
//! exactly.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::{Config, ConfigError};
use crate::player::{ActivePiece, PlayAction};
use crate::rng::ColorDealer;
use crate::scoring::{score_for_clear, score_for_full_clear, score_for_soft_drop, Score};
use crate::snapshot::{RenderPuyo, Scene, ZenkeshiView};
use crate::types::{GameMode, Intents};

/// Undrained events beyond this many drop the oldest.
pub const EVENT_CAPACITY: usize = 32;

/// Observable things that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cleared {
        chain: u32,
        cells: usize,
        colors: usize,
        points: u32,
    },
    FullClear {
        points: u32,
    },
    Locked {
        pivot: Option<(i8, i8)>,
        satellite: Option<(i8, i8)>,
    },
    GameOver {
        frame: u32,
        score: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZenkeshiAnim {
    shown_at: u32,
    hidden_at: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: Config,
    board: Board,
    active: Option<ActivePiece>,
    dealer: ColorDealer,
    mode: GameMode,
    frame: u32,
    score: Score,
    chain: u32,
    max_chain: u32,
    erase_start_frame: u32,
    zenkeshi: Option<ZenkeshiAnim>,
    game_over_frame: Option<u32>,
    episode: u32,
    events: ArrayVec<GameEvent, EVENT_CAPACITY>,
}

fn progress(start: u32, now: u32, duration: u32) -> f32 {
    if duration == 0 {
        return 1.0;
    }
    (now.saturating_sub(start) as f32 / duration as f32).min(1.0)
}

impl GameState {
    /// New game on an empty board.
    pub fn new(config: Config, seed: u32) -> Self {
        let board = Board::with_cell_size(config.cell_size);
        Self::with_board(config, seed, board)
    }

    /// New game after validating `config`.
    pub fn try_new(config: Config, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// New game starting from a prepared board. Floating cells fall on the first ticks.
    pub fn with_board(config: Config, seed: u32, mut board: Board) -> Self {
        board.set_cell_size(config.cell_size);
        Self {
            config,
            board,
            active: None,
            dealer: ColorDealer::new(seed),
            mode: GameMode::Start,
            frame: 0,
            score: Score::new(),
            chain: 0,
            max_chain: 0,
            erase_start_frame: 0,
            zenkeshi: None,
            game_over_frame: None,
            episode: 0,
            events: ArrayVec::new(),
        }
    }

    /// Start over with the same config. The colour sequence carries on.
    pub fn restart(&mut self) {
        let seed = self.dealer.continuation_seed();
        let episode = self.episode.wrapping_add(1);
        *self = Self::new(self.config.clone(), seed);
        self.episode = episode;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Frame the next tick will simulate.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    /// Chain count of the running drop sequence.
    pub fn chain(&self) -> u32 {
        self.chain
    }

    /// Longest chain seen this game.
    pub fn max_chain(&self) -> u32 {
        self.max_chain
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn seed(&self) -> u32 {
        self.dealer.seed()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access (for tests and scenario setup).
    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.mode, GameMode::GameOver | GameMode::Batankyu)
    }

    /// Drain events recorded since the last call.
    pub fn take_events(&mut self) -> ArrayVec<GameEvent, EVENT_CAPACITY> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Looping end-of-game progress in `[0, 1)`, only while in `Batankyu`.
    pub fn batankyu_ratio(&self) -> Option<f32> {
        if self.mode != GameMode::Batankyu {
            return None;
        }
        let start = self.game_over_frame?;
        let cycle = self.config.game_over_cycle_frames.max(1);
        let elapsed = self.frame.saturating_sub(start) % cycle;
        Some(elapsed as f32 / cycle as f32)
    }

    /// Full-clear banner progress, `None` once fully hidden.
    pub fn zenkeshi_view(&self) -> Option<ZenkeshiView> {
        let anim = self.zenkeshi?;
        let duration = self.config.zenkeshi_frames;
        let hide_ratio = anim
            .hidden_at
            .map_or(0.0, |at| progress(at, self.frame, duration));
        if hide_ratio >= 1.0 {
            return None;
        }
        Some(ZenkeshiView {
            show_ratio: progress(anim.shown_at, self.frame, duration),
            hide_ratio,
        })
    }

    fn hide_zenkeshi(&mut self, frame: u32) {
        if let Some(anim) = self.zenkeshi.as_mut() {
            if anim.hidden_at.is_none() {
                anim.hidden_at = Some(frame);
            }
        }
    }

    /// Run one mode transition for the current frame and return the next frame.
    ///
    /// # Panics
    ///
    /// When a piece mode is reached without an active piece, or when a locked
    /// cell lands on an occupied one. Both mean the sequencer itself is broken.
    pub fn tick(&mut self, intents: Intents) -> u32 {
        let frame = self.frame;

        self.mode = match self.mode {
            GameMode::Start => GameMode::CheckFall,
            GameMode::CheckFall => {
                if self.board.resolve_gravity_step() {
                    GameMode::Fall
                } else {
                    GameMode::CheckErase
                }
            }
            GameMode::Fall => {
                if self.board.advance_fall(self.config.free_fall_speed) {
                    GameMode::Fall
                } else {
                    GameMode::CheckErase
                }
            }
            GameMode::CheckErase => self.check_erase(frame),
            GameMode::Erasing => {
                let elapsed = frame.saturating_sub(self.erase_start_frame);
                if self.board.advance_erase(elapsed, self.config.erase_frames) {
                    GameMode::Erasing
                } else {
                    GameMode::CheckFall
                }
            }
            GameMode::NewPuyo => {
                match ActivePiece::spawn(&mut self.board, &self.config, &mut self.dealer) {
                    Some(piece) => {
                        self.active = Some(piece);
                        GameMode::Playing
                    }
                    None => GameMode::GameOver,
                }
            }
            GameMode::Playing => self.play(intents, frame),
            GameMode::Moving => {
                let piece = Self::piece_mut(&mut self.active, GameMode::Moving);
                if piece.tick_moving(&self.board, &self.config, frame) {
                    GameMode::Moving
                } else {
                    GameMode::Playing
                }
            }
            GameMode::Rotating => {
                let piece = Self::piece_mut(&mut self.active, GameMode::Rotating);
                if piece.tick_rotating(&self.board, &self.config, frame) {
                    GameMode::Rotating
                } else {
                    GameMode::Playing
                }
            }
            GameMode::Fix => {
                let piece = self
                    .active
                    .take()
                    .unwrap_or_else(|| panic!("fix without an active piece"));
                let locked = piece.lock(&mut self.board);
                self.push_event(GameEvent::Locked {
                    pivot: locked.pivot,
                    satellite: locked.satellite,
                });
                GameMode::CheckFall
            }
            GameMode::GameOver => {
                self.game_over_frame = Some(frame);
                self.push_event(GameEvent::GameOver {
                    frame,
                    score: self.score.total(),
                });
                GameMode::Batankyu
            }
            GameMode::Batankyu => GameMode::Batankyu,
        };

        self.frame = frame.saturating_add(1);
        if self.zenkeshi.is_some() && self.zenkeshi_view().is_none() {
            self.zenkeshi = None;
        }
        self.frame
    }

    fn piece_mut(active: &mut Option<ActivePiece>, mode: GameMode) -> &mut ActivePiece {
        match active.as_mut() {
            Some(piece) => piece,
            None => panic!("mode {} without an active piece", mode.as_str()),
        }
    }

    fn check_erase(&mut self, frame: u32) -> GameMode {
        match self.board.detect_clears(self.config.erase_threshold) {
            Some(clear) => {
                self.chain += 1;
                self.max_chain = self.max_chain.max(self.chain);
                let points = score_for_clear(self.chain, clear.cleared_cells, clear.distinct_colors);
                self.score.add(points);
                self.erase_start_frame = frame;
                self.hide_zenkeshi(frame);
                self.push_event(GameEvent::Cleared {
                    chain: self.chain,
                    cells: clear.cleared_cells,
                    colors: clear.distinct_colors,
                    points,
                });
                GameMode::Erasing
            }
            None => {
                if self.chain > 0 && self.board.is_empty() {
                    let points = score_for_full_clear();
                    self.score.add(points);
                    self.zenkeshi = Some(ZenkeshiAnim {
                        shown_at: frame,
                        hidden_at: None,
                    });
                    self.push_event(GameEvent::FullClear { points });
                }
                self.chain = 0;
                GameMode::NewPuyo
            }
        }
    }

    fn play(&mut self, intents: Intents, frame: u32) -> GameMode {
        let piece = Self::piece_mut(&mut self.active, GameMode::Playing);
        let (action, fall) = piece.tick_play(&self.board, &self.config, intents, frame);
        for _ in 0..fall.soft_drop_rows {
            self.score.add(score_for_soft_drop());
        }
        match action {
            PlayAction::Playing => GameMode::Playing,
            PlayAction::Moving => GameMode::Moving,
            PlayAction::Rotating => GameMode::Rotating,
            PlayAction::Fix => GameMode::Fix,
        }
    }

    /// Fill `out` with the renderable scene, reusing its allocation.
    pub fn scene_into(&self, out: &mut Scene) {
        let cell = self.config.cell_size;
        out.clear();

        for placed in self.board.occupied() {
            let top = self
                .board
                .falling_top(placed.puyo.id)
                .unwrap_or(placed.row as f32 * cell);
            out.puyos.push(RenderPuyo {
                id: placed.puyo.id,
                color: placed.puyo.color,
                left: placed.col as f32 * cell,
                top,
                visible: true,
            });
        }
        for (placed, visible) in self.board.erasing() {
            out.puyos.push(RenderPuyo {
                id: placed.puyo.id,
                color: placed.puyo.color,
                left: placed.col as f32 * cell,
                top: placed.row as f32 * cell,
                visible,
            });
        }
        if let Some(piece) = &self.active {
            let (left, top) = piece.pivot_pixel();
            out.puyos.push(RenderPuyo {
                id: piece.pivot().id,
                color: piece.pivot().color,
                left,
                top,
                visible: true,
            });
            let (left, top) = piece.satellite_pixel(cell);
            out.puyos.push(RenderPuyo {
                id: piece.satellite().id,
                color: piece.satellite().color,
                left,
                top,
                visible: true,
            });
        }

        out.score = self.score.total();
        out.mode = self.mode;
        out.chain = self.chain;
        out.frame = self.frame;
        out.episode = self.episode;
        out.cell_size = cell;
        out.batankyu_ratio = self.batankyu_ratio();
        out.zenkeshi = self.zenkeshi_view();
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::default();
        self.scene_into(&mut scene);
        scene
    }
}
