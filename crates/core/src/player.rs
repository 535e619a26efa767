//! Player module - the two-cell active pair
//!
//! The pair is a pivot plus a satellite whose offset follows [`Orientation`].
//! Its vertical position is continuous (`top`, in pixels) while `row` is the grid
//! row the pivot currently counts as occupying; `left` is the interpolated pixel
//! column used while a lateral move or a rotation animates.
//!
//! Collision rules:
//!
//! - Downward checks treat the floor as blocked and anything above row 0 as free.
//! - Sideways checks treat the walls as blocked and rows outside the grid as free.

use crate::board::{Board, Puyo};
use crate::config::Config;
use crate::rng::ColorDealer;
use crate::types::{Intents, Orientation, BOARD_COLS, BOARD_ROWS};

/// What the sequencer should do after a playing tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAction {
    Playing,
    Moving,
    Rotating,
    Fix,
}

/// Result of one tick of natural fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallOutcome {
    /// Ground grace period ran out.
    pub locked: bool,
    /// Row boundaries crossed with fast drop held.
    pub soft_drop_rows: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Move {
        start_frame: u32,
        from_left: f32,
        to_left: f32,
    },
    Rotate {
        start_frame: u32,
        from_left: f32,
        to_left: f32,
        from_degrees: f32,
    },
}

/// Cells written by [`ActivePiece::lock`]; `None` for a cell left above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedCells {
    pub pivot: Option<(i8, i8)>,
    pub satellite: Option<(i8, i8)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    pivot: Puyo,
    satellite: Puyo,
    col: i8,
    row: i8,
    left: f32,
    top: f32,
    /// Logical orientation; switches as soon as a rotation starts.
    orientation: Orientation,
    /// Drawn angle in degrees, interpolated during a rotation.
    angle: f32,
    ground_frames: u32,
    transition: Option<Transition>,
}

fn floor_blocked(board: &Board, col: i8, row: i8) -> bool {
    if row < 0 {
        return false;
    }
    if row >= BOARD_ROWS as i8 {
        return true;
    }
    board.is_blocked(col, row)
}

fn side_blocked(board: &Board, col: i8, row: i8) -> bool {
    if col < 0 || col >= BOARD_COLS as i8 {
        return true;
    }
    board.is_occupied(col, row)
}

fn interpolate(start_frame: u32, frame: u32, duration: u32) -> f32 {
    if duration == 0 {
        return 1.0;
    }
    (frame.saturating_sub(start_frame) as f32 / duration as f32).min(1.0)
}

impl ActivePiece {
    /// Spawn a new pair at the spawn column, one row above the grid.
    ///
    /// Returns `None` when the spawn cell on row 0 is occupied.
    pub fn spawn(board: &mut Board, config: &Config, dealer: &mut ColorDealer) -> Option<Self> {
        let col = config.spawn_col;
        if board.is_occupied(col, 0) {
            return None;
        }
        let (pivot_color, satellite_color) = dealer.draw_pair(config.clamped_color_count());
        let pivot = Puyo {
            id: board.allocate_id(),
            color: pivot_color,
        };
        let satellite = Puyo {
            id: board.allocate_id(),
            color: satellite_color,
        };
        Some(Self {
            pivot,
            satellite,
            col,
            row: -1,
            left: col as f32 * config.cell_size,
            top: -config.cell_size,
            orientation: Orientation::Up,
            angle: Orientation::Up.degrees() as f32,
            ground_frames: 0,
            transition: None,
        })
    }

    /// Move a settled piece to `(col, row)` facing `orientation`, snapped to the grid
    /// and airborne. Used to stage positions without playing the pair there.
    pub fn set_position(&mut self, col: i8, row: i8, orientation: Orientation, cell_size: f32) {
        self.col = col;
        self.row = row;
        self.left = col as f32 * cell_size;
        self.top = row as f32 * cell_size;
        self.orientation = orientation;
        self.angle = orientation.degrees() as f32;
        self.ground_frames = 0;
        self.transition = None;
    }

    pub fn pivot(&self) -> Puyo {
        self.pivot
    }

    pub fn satellite(&self) -> Puyo {
        self.satellite
    }

    pub fn col(&self) -> i8 {
        self.col
    }

    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn ground_frames(&self) -> u32 {
        self.ground_frames
    }

    pub fn is_grounded(&self) -> bool {
        self.ground_frames > 0
    }

    /// Grid cell of the satellite.
    pub fn satellite_cell(&self) -> (i8, i8) {
        let (dx, dy) = self.orientation.offset();
        (self.col + dx, self.row + dy)
    }

    /// Pixel `(left, top)` of the pivot.
    pub fn pivot_pixel(&self) -> (f32, f32) {
        (self.left, self.top)
    }

    /// Pixel `(left, top)` of the satellite at the drawn angle.
    pub fn satellite_pixel(&self, cell_size: f32) -> (f32, f32) {
        let rad = self.angle.to_radians();
        (
            self.left + rad.cos() * cell_size,
            self.top - rad.sin() * cell_size,
        )
    }

    fn below_blocked(&self, board: &Board) -> bool {
        let (dx, dy) = self.orientation.offset();
        floor_blocked(board, self.col, self.row + 1)
            || floor_blocked(board, self.col + dx, self.row + dy + 1)
    }

    /// One tick of natural fall, faster while `fast_drop` is held.
    ///
    /// Touching down starts the ground timer; the piece locks once the timer
    /// exceeds `config.ground_frames`.
    pub fn tick_fall(&mut self, board: &Board, config: &Config, fast_drop: bool) -> FallOutcome {
        let mut outcome = FallOutcome::default();

        if !self.below_blocked(board) {
            self.top += config.player_fall_speed;
            if fast_drop {
                self.top += config.player_down_speed;
            }
            if (self.top / config.cell_size).floor() as i8 != self.row {
                if fast_drop {
                    outcome.soft_drop_rows += 1;
                }
                self.row += 1;
                if self.below_blocked(board) {
                    self.top = self.row as f32 * config.cell_size;
                    self.ground_frames = 1;
                } else {
                    self.ground_frames = 0;
                }
            } else {
                self.ground_frames = 0;
            }
            return outcome;
        }

        if self.ground_frames == 0 {
            self.ground_frames = 1;
        } else {
            self.ground_frames += 1;
            outcome.locked = self.ground_frames > config.ground_frames;
        }
        outcome
    }

    /// One tick of player control: fall, then a lateral move or a rotation.
    ///
    /// A lateral intent wins over rotation. Blocked moves leave the piece in
    /// `Playing`.
    pub fn tick_play(
        &mut self,
        board: &Board,
        config: &Config,
        intents: Intents,
        frame: u32,
    ) -> (PlayAction, FallOutcome) {
        let fall = self.tick_fall(board, config, intents.fast_drop);
        if fall.locked {
            return (PlayAction::Fix, fall);
        }

        if intents.left || intents.right {
            let step = if intents.right { 1 } else { -1 };
            let action = if self.try_start_move(board, config, step, frame) {
                PlayAction::Moving
            } else {
                PlayAction::Playing
            };
            return (action, fall);
        }

        if intents.rotate && self.try_start_rotation(board, config, frame) {
            return (PlayAction::Rotating, fall);
        }

        (PlayAction::Playing, fall)
    }

    fn try_start_move(&mut self, board: &Board, config: &Config, step: i8, frame: u32) -> bool {
        let (sat_col, sat_row) = self.satellite_cell();
        let target = self.col + step;
        let sat_target = sat_col + step;

        let mut blocked =
            side_blocked(board, target, self.row) || side_blocked(board, sat_target, sat_row);
        // Airborne pieces straddle two rows.
        if !self.is_grounded() {
            blocked = blocked
                || side_blocked(board, target, self.row + 1)
                || side_blocked(board, sat_target, sat_row + 1);
        }
        if blocked {
            return false;
        }

        self.transition = Some(Transition::Move {
            start_frame: frame,
            from_left: self.col as f32 * config.cell_size,
            to_left: target as f32 * config.cell_size,
        });
        self.col = target;
        true
    }

    fn try_start_rotation(&mut self, board: &Board, config: &Config, frame: u32) -> bool {
        let (col, row) = (self.col, self.row);
        let mut kick_col = 0i8;
        let mut lift = false;

        let side = |c: i8| side_blocked(board, c, row) || side_blocked(board, c, row + 1);

        match self.orientation {
            Orientation::Right => {}
            Orientation::Up => {
                if side(col - 1) {
                    if side(col + 1) {
                        return false;
                    }
                    kick_col = 1;
                }
            }
            Orientation::Left => {
                lift = floor_blocked(board, col, row + 2) || floor_blocked(board, col - 1, row + 2);
            }
            Orientation::Down => {
                if side(col + 1) {
                    if side(col - 1) {
                        return false;
                    }
                    kick_col = -1;
                }
            }
        }

        if lift {
            if self.is_grounded() {
                self.row -= 1;
                self.ground_frames = 0;
            }
            self.top = self.row as f32 * config.cell_size;
        }

        self.transition = Some(Transition::Rotate {
            start_frame: frame,
            from_left: col as f32 * config.cell_size,
            to_left: (col + kick_col) as f32 * config.cell_size,
            from_degrees: self.orientation.degrees() as f32,
        });
        self.col += kick_col;
        self.orientation = self.orientation.rotate();
        true
    }

    /// Advance a lateral move; natural fall continues underneath.
    ///
    /// Returns `false` once the move has finished.
    pub fn tick_moving(&mut self, board: &Board, config: &Config, frame: u32) -> bool {
        self.tick_fall(board, config, false);
        let Some(Transition::Move {
            start_frame,
            from_left,
            to_left,
        }) = self.transition
        else {
            return false;
        };
        let ratio = interpolate(start_frame, frame, config.move_frames);
        self.left = from_left + (to_left - from_left) * ratio;
        if ratio >= 1.0 {
            self.transition = None;
            return false;
        }
        true
    }

    /// Advance a rotation; natural fall continues underneath.
    ///
    /// Returns `false` once the rotation has finished.
    pub fn tick_rotating(&mut self, board: &Board, config: &Config, frame: u32) -> bool {
        self.tick_fall(board, config, false);
        let Some(Transition::Rotate {
            start_frame,
            from_left,
            to_left,
            from_degrees,
        }) = self.transition
        else {
            return false;
        };
        let ratio = interpolate(start_frame, frame, config.rotate_frames);
        self.left = from_left + (to_left - from_left) * ratio;
        self.angle = from_degrees + 90.0 * ratio;
        if ratio >= 1.0 {
            self.angle = self.orientation.degrees() as f32;
            self.transition = None;
            return false;
        }
        true
    }

    /// Commit both cells to the board. Cells still above row 0 are dropped.
    ///
    /// # Panics
    ///
    /// When a target cell is already occupied.
    pub fn lock(self, board: &mut Board) -> LockedCells {
        let mut locked = LockedCells {
            pivot: None,
            satellite: None,
        };
        if self.row >= 0 {
            board.place_puyo(self.col, self.row, self.pivot);
            locked.pivot = Some((self.col, self.row));
        }
        let (sat_col, sat_row) = self.satellite_cell();
        if sat_row >= 0 {
            board.place_puyo(sat_col, sat_row, self.satellite);
            locked.satellite = Some((sat_col, sat_row));
        }
        locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PuyoColor;

    fn spawn(board: &mut Board) -> ActivePiece {
        ActivePiece::spawn(board, &Config::default(), &mut ColorDealer::new(1))
            .expect("spawn cell is free")
    }

    fn staged(board: &mut Board, col: i8, row: i8, orientation: Orientation) -> ActivePiece {
        let mut piece = spawn(board);
        piece.set_position(col, row, orientation, 40.0);
        piece
    }

    const ROTATE: Intents = Intents {
        left: false,
        right: false,
        rotate: true,
        fast_drop: false,
    };

    #[test]
    fn test_spawn_above_grid_facing_up() {
        let mut board = Board::new();
        let piece = spawn(&mut board);
        assert_eq!((piece.col(), piece.row()), (2, -1));
        assert_eq!(piece.orientation(), Orientation::Up);
        assert_eq!(piece.satellite_cell(), (2, -2));
        assert_eq!(piece.pivot_pixel(), (80.0, -40.0));
        assert_eq!(piece.ground_frames(), 0);
        assert_ne!(piece.pivot().id, piece.satellite().id);
    }

    #[test]
    fn test_spawn_fails_on_occupied_spawn_cell() {
        let mut board = Board::new();
        board.place(2, 0, PuyoColor::Red);
        let spawned = ActivePiece::spawn(&mut board, &Config::default(), &mut ColorDealer::new(1));
        assert!(spawned.is_none());
    }

    #[test]
    fn test_spawn_uses_configured_colors() {
        let mut board = Board::new();
        let config = Config {
            color_count: 1,
            ..Config::default()
        };
        let piece = ActivePiece::spawn(&mut board, &config, &mut ColorDealer::new(5))
            .expect("free spawn cell");
        assert_eq!(piece.pivot().color, PuyoColor::Red);
        assert_eq!(piece.satellite().color, PuyoColor::Red);
    }

    #[test]
    fn test_satellite_pixel_follows_angle() {
        let mut board = Board::new();
        let piece = staged(&mut board, 3, 5, Orientation::Right);
        let (left, top) = piece.satellite_pixel(40.0);
        assert!((left - 160.0).abs() < 1e-3);
        assert!((top - 200.0).abs() < 1e-3);

        let piece = staged(&mut board, 3, 5, Orientation::Up);
        let (left, top) = piece.satellite_pixel(40.0);
        assert!((left - 120.0).abs() < 1e-3);
        assert!((top - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_fall_crosses_rows_and_counts_soft_drop() {
        let board = Board::new();
        let config = Config::default();
        let mut piece = spawn(&mut Board::new());

        // -40 + 15.9 * 3 = 7.7: crosses into row 0 on the third tick.
        let mut rows = 0;
        for _ in 0..3 {
            rows += piece.tick_fall(&board, &config, true).soft_drop_rows;
        }
        assert_eq!(piece.row(), 0);
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_ground_timer_locks_after_grace_period() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 0, 11, Orientation::Up);

        for _ in 0..config.ground_frames {
            assert!(!piece.tick_fall(&board, &config, false).locked);
        }
        assert_eq!(piece.ground_frames(), 20);
        assert!(piece.tick_fall(&board, &config, false).locked);
    }

    #[test]
    fn test_satellite_below_supports_the_pair() {
        let mut board = Board::from_rows(&["...G.."]);
        let config = Config::default();
        // Satellite hanging below the pivot: only that column supports the pair.
        let mut piece = staged(&mut board, 2, 9, Orientation::Down);
        piece.tick_fall(&board, &config, false);
        assert!(!piece.is_grounded());

        let mut piece = staged(&mut board, 3, 9, Orientation::Down);
        piece.tick_fall(&board, &config, false);
        assert!(piece.is_grounded());
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 0, 5, Orientation::Up);
        let left = Intents {
            left: true,
            ..Intents::NONE
        };
        let (action, _) = piece.tick_play(&board, &config, left, 0);
        assert_eq!(action, PlayAction::Playing);
        assert_eq!(piece.col(), 0);
    }

    #[test]
    fn test_move_interpolates_then_snaps() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 2, 3, Orientation::Up);
        let right = Intents {
            right: true,
            ..Intents::NONE
        };
        let (action, _) = piece.tick_play(&board, &config, right, 100);
        assert_eq!(action, PlayAction::Moving);
        assert_eq!(piece.col(), 3);

        assert!(piece.tick_moving(&board, &config, 105));
        assert!((piece.pivot_pixel().0 - 100.0).abs() < 1e-3);
        assert!(!piece.tick_moving(&board, &config, 110));
        assert_eq!(piece.pivot_pixel().0, 120.0);
    }

    #[test]
    fn test_airborne_move_checks_row_below() {
        let mut board = Board::from_rows(&["...R.."]);
        let config = Config::default();
        let right = Intents {
            right: true,
            ..Intents::NONE
        };

        let mut piece = staged(&mut board, 2, 10, Orientation::Up);
        let (action, _) = piece.tick_play(&board, &config, right, 0);
        assert_eq!(action, PlayAction::Playing);
    }

    #[test]
    fn test_rotate_up_kicks_right_off_blocked_left() {
        let mut board = Board::from_rows(&["R.....", "R....."]);
        let config = Config::default();
        let mut piece = staged(&mut board, 1, 9, Orientation::Up);

        let (action, _) = piece.tick_play(&board, &config, ROTATE, 0);
        assert_eq!(action, PlayAction::Rotating);
        assert_eq!(piece.col(), 2);
        assert_eq!(piece.orientation(), Orientation::Left);
        assert_eq!(piece.satellite_cell(), (1, piece.row()));
    }

    #[test]
    fn test_rotate_up_rejected_between_two_walls() {
        let mut board = Board::from_rows(&["R.R...", "R.R..."]);
        let config = Config::default();
        let mut piece = staged(&mut board, 1, 9, Orientation::Up);

        let (action, _) = piece.tick_play(&board, &config, ROTATE, 0);
        assert_eq!(action, PlayAction::Playing);
        assert_eq!(piece.col(), 1);
        assert_eq!(piece.orientation(), Orientation::Up);
    }

    #[test]
    fn test_rotate_down_kicks_left_off_right_wall() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 5, 4, Orientation::Down);

        let (action, _) = piece.tick_play(&board, &config, ROTATE, 0);
        assert_eq!(action, PlayAction::Rotating);
        assert_eq!(piece.col(), 4);
        assert_eq!(piece.satellite_cell(), (5, piece.row()));
    }

    #[test]
    fn test_rotate_left_lifts_grounded_piece() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 3, 11, Orientation::Left);
        // Touch down first.
        piece.tick_fall(&board, &config, false);
        assert!(piece.is_grounded());

        let (action, _) = piece.tick_play(&board, &config, ROTATE, 0);
        assert_eq!(action, PlayAction::Rotating);
        assert_eq!(piece.row(), 10);
        assert_eq!(piece.ground_frames(), 0);
        assert_eq!(piece.orientation(), Orientation::Down);
        assert_eq!(piece.satellite_cell(), (3, 11));
        assert_eq!(piece.pivot_pixel().1, 400.0);
    }

    #[test]
    fn test_rotation_interpolates_angle() {
        let mut board = Board::new();
        let config = Config::default();
        let mut piece = staged(&mut board, 2, 3, Orientation::Right);

        let (action, _) = piece.tick_play(&board, &config, ROTATE, 0);
        assert_eq!(action, PlayAction::Rotating);
        assert!(piece.tick_rotating(&board, &config, 5));
        assert!((piece.angle - 45.0).abs() < 1e-3);
        assert!(!piece.tick_rotating(&board, &config, 10));
        assert_eq!(piece.angle, 90.0);
        assert_eq!(piece.orientation(), Orientation::Up);
    }

    #[test]
    fn test_lock_drops_cells_above_grid() {
        let mut board = Board::new();
        let piece = staged(&mut board, 2, 0, Orientation::Up);
        let pivot = piece.pivot();

        let locked = piece.lock(&mut board);
        assert_eq!(locked.pivot, Some((2, 0)));
        assert_eq!(locked.satellite, None);
        assert_eq!(board.puyo_count(), 1);
        assert_eq!(board.get(2, 0), Some(Some(pivot)));
    }

    #[test]
    fn test_lock_keeps_identity() {
        let mut board = Board::new();
        let piece = staged(&mut board, 4, 11, Orientation::Up);
        let (pivot, satellite) = (piece.pivot(), piece.satellite());
        piece.lock(&mut board);
        assert_eq!(board.get(4, 11), Some(Some(pivot)));
        assert_eq!(board.get(4, 10), Some(Some(satellite)));
    }
}
