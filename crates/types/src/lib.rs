//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation core, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! The reference playfield:
//!
//! - **Columns**: 6 (indexed 0-5, left to right)
//! - **Rows**: 12 (indexed 0-11, top to bottom)
//! - **Spawn cell**: column 2 of row 0; a new pair appears one row above it
//!
//! # Timing
//!
//! The simulation is frame-stepped. Every duration in the core is counted in
//! ticks, and the runner calls the sequencer once per tick:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `TICKS_PER_SECOND` | 60 | Nominal frame rate |
//!
//! # Examples
//!
//! ```
//! use puyo_types::{Orientation, PuyoColor, GameMode, BOARD_COLS, BOARD_ROWS};
//!
//! let color = PuyoColor::from_index(2).unwrap();
//! assert_eq!(color, PuyoColor::Blue);
//!
//! // Rotation always advances by +90 degrees.
//! assert_eq!(Orientation::Up.rotate(), Orientation::Left);
//!
//! assert_eq!(GameMode::Batankyu.as_str(), "batankyu");
//! assert_eq!((BOARD_COLS, BOARD_ROWS), (6, 12));
//! ```

/// Board width in cells (6 columns)
pub const BOARD_COLS: u8 = 6;

/// Board height in cells (12 rows)
pub const BOARD_ROWS: u8 = 12;

/// Total number of cells on the board
pub const BOARD_SIZE: usize = BOARD_COLS as usize * BOARD_ROWS as usize;

/// Upper bound for the number of distinct colours in play
pub const MAX_COLORS: u8 = 5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Nominal simulation rate
pub const TICKS_PER_SECOND: u32 = 60;

/// Colours a puyo can take.
///
/// Indices start at 1 so that 0 stays free for "empty" in compact encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PuyoColor {
    Red = 1,
    Blue = 2,
    Green = 3,
    Yellow = 4,
    Purple = 5,
}

impl PuyoColor {
    /// All colours in index order.
    pub const ALL: [PuyoColor; MAX_COLORS as usize] = [
        PuyoColor::Red,
        PuyoColor::Blue,
        PuyoColor::Green,
        PuyoColor::Yellow,
        PuyoColor::Purple,
    ];

    /// Look up a colour by its 1-based index.
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_types::PuyoColor;
    ///
    /// assert_eq!(PuyoColor::from_index(1), Some(PuyoColor::Red));
    /// assert_eq!(PuyoColor::from_index(5), Some(PuyoColor::Purple));
    /// assert_eq!(PuyoColor::from_index(0), None);
    /// assert_eq!(PuyoColor::from_index(6), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=MAX_COLORS => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// 1-based colour index.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse a colour from its initial or full name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "r" | "red" => Some(PuyoColor::Red),
            "b" | "blue" => Some(PuyoColor::Blue),
            "g" | "green" => Some(PuyoColor::Green),
            "y" | "yellow" => Some(PuyoColor::Yellow),
            "p" | "purple" => Some(PuyoColor::Purple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PuyoColor::Red => "red",
            PuyoColor::Blue => "blue",
            PuyoColor::Green => "green",
            PuyoColor::Yellow => "yellow",
            PuyoColor::Purple => "purple",
        }
    }
}

/// Where the satellite puyo sits relative to the pivot.
///
/// Angles are counter-clockwise with 0° pointing right:
/// - **Right**: 0°
/// - **Up**: 90° (spawn orientation)
/// - **Left**: 180°
/// - **Down**: 270°
///
/// A rotation always advances by +90°: Right → Up → Left → Down → Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Right,
    Up,
    Left,
    Down,
}

impl Orientation {
    /// Advance by +90°.
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_types::Orientation;
    ///
    /// assert_eq!(Orientation::Right.rotate(), Orientation::Up);
    /// assert_eq!(Orientation::Up.rotate(), Orientation::Left);
    /// assert_eq!(Orientation::Left.rotate(), Orientation::Down);
    /// assert_eq!(Orientation::Down.rotate(), Orientation::Right);
    /// ```
    pub fn rotate(&self) -> Self {
        match self {
            Orientation::Right => Orientation::Up,
            Orientation::Up => Orientation::Left,
            Orientation::Left => Orientation::Down,
            Orientation::Down => Orientation::Right,
        }
    }

    /// Satellite offset `(dx, dy)` from the pivot, with `y` growing downwards.
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Orientation::Right => (1, 0),
            Orientation::Up => (0, -1),
            Orientation::Left => (-1, 0),
            Orientation::Down => (0, 1),
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Orientation::Right => 0,
            Orientation::Up => 90,
            Orientation::Left => 180,
            Orientation::Down => 270,
        }
    }

    /// Parse from a multiple of 90 degrees (any whole turn is folded back).
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Orientation::Right),
            90 => Some(Orientation::Up),
            180 => Some(Orientation::Left),
            270 => Some(Orientation::Down),
            _ => None,
        }
    }
}

/// Snapshot of the four directional intents, read once per tick.
///
/// The input collaborator keeps this up to date; the core never captures input
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    /// Rotate the pair by +90°.
    pub rotate: bool,
    /// Fast drop (held down).
    pub fast_drop: bool,
}

impl Intents {
    /// No intent held.
    pub const NONE: Intents = Intents {
        left: false,
        right: false,
        rotate: false,
        fast_drop: false,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::NONE
    }
}

/// States of the top-level sequencer. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Start,
    CheckFall,
    Fall,
    CheckErase,
    Erasing,
    NewPuyo,
    Playing,
    Moving,
    Rotating,
    Fix,
    GameOver,
    /// Terminal end-of-game state; only an external restart leaves it.
    Batankyu,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Start => "start",
            GameMode::CheckFall => "checkFall",
            GameMode::Fall => "fall",
            GameMode::CheckErase => "checkErase",
            GameMode::Erasing => "erasing",
            GameMode::NewPuyo => "newPuyo",
            GameMode::Playing => "playing",
            GameMode::Moving => "moving",
            GameMode::Rotating => "rotating",
            GameMode::Fix => "fix",
            GameMode::GameOver => "gameOver",
            GameMode::Batankyu => "batankyu",
        }
    }

    /// True while a player-controlled pair exists.
    pub fn has_active_piece(&self) -> bool {
        matches!(
            self,
            GameMode::Playing | GameMode::Moving | GameMode::Rotating | GameMode::Fix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_constants_match_reference_grid() {
        assert_eq!(BOARD_COLS, 6);
        assert_eq!(BOARD_ROWS, 12);
        assert_eq!(BOARD_SIZE, 72);
    }

    #[test]
    fn color_index_roundtrip() {
        for color in PuyoColor::ALL {
            assert_eq!(PuyoColor::from_index(color.index()), Some(color));
            assert_eq!(PuyoColor::from_str(color.as_str()), Some(color));
        }
    }

    #[test]
    fn orientation_offsets_follow_angles() {
        assert_eq!(Orientation::Right.offset(), (1, 0));
        assert_eq!(Orientation::Up.offset(), (0, -1));
        assert_eq!(Orientation::Left.offset(), (-1, 0));
        assert_eq!(Orientation::Down.offset(), (0, 1));

        for o in [
            Orientation::Right,
            Orientation::Up,
            Orientation::Left,
            Orientation::Down,
        ] {
            assert_eq!(Orientation::from_degrees(o.degrees()), Some(o));
            assert_eq!(o.rotate().degrees(), (o.degrees() + 90) % 360);
        }
        assert_eq!(Orientation::from_degrees(45), None);
    }

    #[test]
    fn intents_default_is_idle() {
        assert!(Intents::default().is_idle());
        let held = Intents {
            fast_drop: true,
            ..Intents::NONE
        };
        assert!(!held.is_idle());
    }

    #[test]
    fn modes_with_active_piece() {
        assert!(GameMode::Playing.has_active_piece());
        assert!(GameMode::Rotating.has_active_piece());
        assert!(!GameMode::NewPuyo.has_active_piece());
        assert!(!GameMode::Batankyu.has_active_piece());
    }
}
