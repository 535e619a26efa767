//! Behavioural tunables of the simulation.
//!
//! Grid dimensions are compile-time constants (see [`crate::types`]); everything
//! else that the sequencer and the active pair depend on lives here. Speeds are
//! in pixels per tick, durations in ticks.

use thiserror::Error;

use crate::types::{BOARD_COLS, MAX_COLORS};

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cell size must be a positive number of pixels, got {0}")]
    CellSize(f32),
    #[error("{name} must be positive, got {value}")]
    Speed { name: &'static str, value: f32 },
    #[error("{name} must last at least one frame")]
    Duration { name: &'static str },
    #[error("erase threshold must be at least 2, got {0}")]
    EraseThreshold(usize),
    #[error("spawn column {col} is outside the {cols}-column board")]
    SpawnColumn { col: i8, cols: u8 },
    #[error("fast drop speed {0} would skip rows (must stay below the cell size)")]
    DropTooFast(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Edge length of one cell in pixels.
    pub cell_size: f32,
    /// Minimum region size that clears.
    pub erase_threshold: usize,
    /// Number of colours in play (clamped to 1..=5 on use).
    pub color_count: u8,
    /// Natural fall of the active pair.
    pub player_fall_speed: f32,
    /// Extra fall while fast drop is held.
    pub player_down_speed: f32,
    /// Fall speed of board cells during gravity resolution.
    pub free_fall_speed: f32,
    pub move_frames: u32,
    pub rotate_frames: u32,
    /// Grace period between touching down and locking.
    pub ground_frames: u32,
    pub erase_frames: u32,
    pub zenkeshi_frames: u32,
    /// Period of the looping end-of-game animation.
    pub game_over_cycle_frames: u32,
    pub spawn_col: i8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            erase_threshold: 4,
            color_count: 4,
            player_fall_speed: 0.9,
            player_down_speed: 15.0,
            free_fall_speed: 16.0,
            move_frames: 10,
            rotate_frames: 10,
            ground_frames: 20,
            erase_frames: 30,
            zenkeshi_frames: 9,
            game_over_cycle_frames: 3000,
            spawn_col: 2,
        }
    }
}

impl Config {
    /// Colour count clamped to `1..=MAX_COLORS`.
    pub fn clamped_color_count(&self) -> u8 {
        self.color_count.clamp(1, MAX_COLORS)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        for (name, value) in [
            ("player fall speed", self.player_fall_speed),
            ("free fall speed", self.free_fall_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Speed { name, value });
            }
        }
        if self.player_down_speed < 0.0 {
            return Err(ConfigError::Speed {
                name: "player down speed",
                value: self.player_down_speed,
            });
        }
        // One tick may cross at most one row boundary.
        if self.player_fall_speed + self.player_down_speed >= self.cell_size {
            return Err(ConfigError::DropTooFast(
                self.player_fall_speed + self.player_down_speed,
            ));
        }
        for (name, value) in [
            ("move duration", self.move_frames),
            ("rotate duration", self.rotate_frames),
            ("erase animation", self.erase_frames),
            ("zenkeshi animation", self.zenkeshi_frames),
            ("game over cycle", self.game_over_cycle_frames),
        ] {
            if value == 0 {
                return Err(ConfigError::Duration { name });
            }
        }
        if self.erase_threshold < 2 {
            return Err(ConfigError::EraseThreshold(self.erase_threshold));
        }
        if self.spawn_col < 0 || self.spawn_col >= BOARD_COLS as i8 {
            return Err(ConfigError::SpawnColumn {
                col: self.spawn_col,
                cols: BOARD_COLS,
            });
        }
        Ok(())
    }
}
