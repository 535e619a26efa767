//! Board module - the fixed 6x12 grid of settled puyos
//!
//! Cells live in a flat row-major array (`row * BOARD_COLS + col`). Besides the
//! grid itself the board owns the two animation lists the sequencer drives:
//!
//! - the **falling list**, filled by [`Board::resolve_gravity_step`]: cells are
//!   relocated in the grid immediately, the list only interpolates their pixel row;
//! - the **erasing list**, filled by [`Board::detect_clears`]: cleared cells are
//!   already gone from the grid and only blink until [`Board::advance_erase`]
//!   drops them.
//!
//! Coordinates are `(col, row)` with `col` in `0..6` left to right and `row` in
//! `0..12` top to bottom. Both lists and the flood-fill stack are fixed-capacity,
//! so no board operation allocates.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{PuyoColor, BOARD_COLS, BOARD_ROWS, BOARD_SIZE, MAX_COLORS};

/// Pixel size used when the board is built without a config.
pub const DEFAULT_CELL_SIZE: f32 = 40.0;

/// Identity of a puyo, stable across gravity and lock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuyoId(pub u32);

/// An occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Puyo {
    pub id: PuyoId,
    pub color: PuyoColor,
}

/// One grid cell: empty or holding a puyo.
pub type Cell = Option<Puyo>;

/// A puyo together with its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPuyo {
    pub col: i8,
    pub row: i8,
    pub puyo: Puyo,
}

/// A cell sliding down to the row gravity already moved it to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingPuyo {
    pub id: PuyoId,
    pub col: i8,
    pub from_row: i8,
    pub to_row: i8,
    /// Current pixel top.
    pub top: f32,
    pub dest_top: f32,
}

/// Outcome of a clear pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    pub cleared_cells: usize,
    pub distinct_colors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("cell ({col}, {row}) is outside the board")]
    OutOfBounds { col: i8, row: i8 },
    #[error("cell ({col}, {row}) is already occupied")]
    Occupied { col: i8, row: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
    falling: ArrayVec<FallingPuyo, BOARD_SIZE>,
    erasing: ArrayVec<PlacedPuyo, BOARD_SIZE>,
    erase_visible: bool,
    next_id: u32,
    cell_size: f32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            falling: ArrayVec::new(),
            erasing: ArrayVec::new(),
            erase_visible: true,
            next_id: 0,
            cell_size,
        }
    }

    /// Build a board from a picture of its bottom rows.
    ///
    /// The last string is row 11; `.` is empty and `R B G Y P` are colours.
    /// Fewer than six characters leave the rest of the row empty.
    ///
    /// # Panics
    ///
    /// On more than 12 rows, more than 6 columns, or an unknown character.
    ///
    /// ```
    /// use puyo_core::Board;
    ///
    /// let board = Board::from_rows(&["R.....", "RRB..."]);
    /// assert_eq!(board.puyo_count(), 4);
    /// assert!(board.is_occupied(0, 10));
    /// assert!(!board.is_occupied(1, 10));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_ROWS as usize, "too many rows");
        let mut board = Self::new();
        let first_row = BOARD_ROWS as usize - rows.len();
        for (i, line) in rows.iter().enumerate() {
            let row = (first_row + i) as i8;
            assert!(line.chars().count() <= BOARD_COLS as usize, "row {row} too wide");
            for (col, ch) in line.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let color = PuyoColor::from_str(&ch.to_string())
                    .unwrap_or_else(|| panic!("unknown cell {ch:?} in row {row}"));
                board.place(col as i8, row, color);
            }
        }
        board
    }

    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= BOARD_COLS as i8 || row < 0 || row >= BOARD_ROWS as i8 {
            return None;
        }
        Some(row as usize * BOARD_COLS as usize + col as usize)
    }

    #[inline(always)]
    fn position(index: usize) -> (i8, i8) {
        (
            (index % BOARD_COLS as usize) as i8,
            (index / BOARD_COLS as usize) as i8,
        )
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
    }

    /// Cell at `(col, row)`, `None` when out of range.
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Some(_)))
    }

    /// Occupied or outside the grid.
    pub fn is_blocked(&self, col: i8, row: i8) -> bool {
        !matches!(self.get(col, row), Some(None))
    }

    /// Hand out the next identity. Ids are never reused within a board.
    pub fn allocate_id(&mut self) -> PuyoId {
        self.next_id += 1;
        PuyoId(self.next_id)
    }

    /// Place a new puyo of `color`, allocating a fresh id.
    pub fn try_place(&mut self, col: i8, row: i8, color: PuyoColor) -> Result<PuyoId, PlaceError> {
        let idx = self.empty_index(col, row)?;
        let id = self.allocate_id();
        self.cells[idx] = Some(Puyo { id, color });
        Ok(id)
    }

    /// Place an existing puyo, keeping its identity.
    pub fn try_place_puyo(&mut self, col: i8, row: i8, puyo: Puyo) -> Result<(), PlaceError> {
        let idx = self.empty_index(col, row)?;
        self.cells[idx] = Some(puyo);
        Ok(())
    }

    /// # Panics
    ///
    /// When the target is occupied or out of range; the sequencer never does this.
    pub fn place(&mut self, col: i8, row: i8, color: PuyoColor) -> PuyoId {
        match self.try_place(col, row, color) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// # Panics
    ///
    /// When the target is occupied or out of range.
    pub fn place_puyo(&mut self, col: i8, row: i8, puyo: Puyo) {
        if let Err(err) = self.try_place_puyo(col, row, puyo) {
            panic!("{err}");
        }
    }

    fn empty_index(&self, col: i8, row: i8) -> Result<usize, PlaceError> {
        let idx = Self::index(col, row).ok_or(PlaceError::OutOfBounds { col, row })?;
        if self.cells[idx].is_some() {
            return Err(PlaceError::Occupied { col, row });
        }
        Ok(idx)
    }

    /// Remove every puyo and animation. The id counter keeps running.
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
        self.falling.clear();
        self.erasing.clear();
        self.erase_visible = true;
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    pub fn puyo_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = PlacedPuyo> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|puyo| {
                let (col, row) = Self::position(idx);
                PlacedPuyo { col, row, puyo }
            })
        })
    }

    /// Cells of the running erase animation, with the current blink state.
    pub fn erasing(&self) -> impl Iterator<Item = (PlacedPuyo, bool)> + '_ {
        let visible = self.erase_visible;
        self.erasing.iter().map(move |p| (*p, visible))
    }

    pub fn falling(&self) -> &[FallingPuyo] {
        &self.falling
    }

    /// Interpolated pixel top of a cell that is still sliding down.
    pub fn falling_top(&self, id: PuyoId) -> Option<f32> {
        self.falling.iter().find(|f| f.id == id).map(|f| f.top)
    }

    /// Compact every column so no cell floats above a gap.
    ///
    /// Scans rows bottom to top so a whole stack lands in one pass. Moved cells
    /// are registered in the falling list; returns whether anything moved.
    pub fn resolve_gravity_step(&mut self) -> bool {
        self.falling.clear();
        let cols = BOARD_COLS as i8;
        let rows = BOARD_ROWS as i8;

        for row in (0..rows - 1).rev() {
            for col in 0..cols {
                let Some(Some(puyo)) = self.get(col, row) else {
                    continue;
                };
                if self.is_occupied(col, row + 1) {
                    continue;
                }
                let mut dest = row + 1;
                while dest + 1 < rows && !self.is_occupied(col, dest + 1) {
                    dest += 1;
                }
                if let (Some(src), Some(dst)) = (Self::index(col, row), Self::index(col, dest)) {
                    self.cells[src] = None;
                    self.cells[dst] = Some(puyo);
                }
                self.falling.push(FallingPuyo {
                    id: puyo.id,
                    col,
                    from_row: row,
                    to_row: dest,
                    top: row as f32 * self.cell_size,
                    dest_top: dest as f32 * self.cell_size,
                });
            }
        }
        !self.falling.is_empty()
    }

    /// Move every falling cell `speed` pixels closer to its destination.
    ///
    /// Returns whether any cell is still in motion.
    pub fn advance_fall(&mut self, speed: f32) -> bool {
        self.falling.retain(|f| {
            f.top += speed;
            if f.top >= f.dest_top {
                f.top = f.dest_top;
                false
            } else {
                true
            }
        });
        !self.falling.is_empty()
    }

    /// Find every same-colour region of at least `threshold` cells and remove
    /// them all at once.
    ///
    /// Discovery is a read-only flood fill with a visited set; regions below the
    /// threshold are never touched. Removed cells move to the erasing list.
    pub fn detect_clears(&mut self, threshold: usize) -> Option<ClearResult> {
        let mut visited = [false; BOARD_SIZE];
        let mut doomed = [false; BOARD_SIZE];
        let mut colors = [false; MAX_COLORS as usize + 1];
        let mut cleared = 0usize;

        let mut stack: ArrayVec<usize, BOARD_SIZE> = ArrayVec::new();
        let mut region: ArrayVec<usize, BOARD_SIZE> = ArrayVec::new();

        for start in 0..BOARD_SIZE {
            let Some(seed) = self.cells[start] else {
                continue;
            };
            if visited[start] {
                continue;
            }

            stack.clear();
            region.clear();
            visited[start] = true;
            stack.push(start);
            while let Some(idx) = stack.pop() {
                region.push(idx);
                let (col, row) = Self::position(idx);
                for (dc, dr) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                    let Some(next) = Self::index(col + dc, row + dr) else {
                        continue;
                    };
                    if visited[next] {
                        continue;
                    }
                    if matches!(self.cells[next], Some(p) if p.color == seed.color) {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }

            if region.len() >= threshold {
                for &idx in &region {
                    doomed[idx] = true;
                }
                colors[seed.color.index() as usize] = true;
                cleared += region.len();
            }
        }

        if cleared == 0 {
            return None;
        }

        self.erasing.clear();
        for (idx, _) in doomed.iter().enumerate().filter(|(_, d)| **d) {
            if let Some(puyo) = self.cells[idx].take() {
                let (col, row) = Self::position(idx);
                self.erasing.push(PlacedPuyo { col, row, puyo });
            }
        }
        self.erase_visible = true;

        Some(ClearResult {
            cleared_cells: cleared,
            distinct_colors: colors.iter().filter(|c| **c).count(),
        })
    }

    /// Drive the blink animation of the erasing list.
    ///
    /// The duration is split in quarters: hidden, visible, hidden, visible. Once
    /// `elapsed / duration` exceeds 1 the list is dropped and `false` returned.
    pub fn advance_erase(&mut self, elapsed: u32, duration: u32) -> bool {
        let ratio = if duration == 0 {
            f32::INFINITY
        } else {
            elapsed as f32 / duration as f32
        };
        if ratio > 1.0 {
            self.erasing.clear();
            self.erase_visible = true;
            return false;
        }
        self.erase_visible = if ratio > 0.75 {
            true
        } else if ratio > 0.5 {
            false
        } else {
            ratio > 0.25
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PuyoColor::*;

    fn colors_of(board: &Board) -> Vec<(i8, i8, PuyoColor)> {
        board
            .occupied()
            .map(|p| (p.col, p.row, p.puyo.color))
            .collect()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.puyo_count(), 0);
        assert_eq!(board.cell_size(), 40.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(6, 0), None);
        assert_eq!(board.get(0, 12), None);
        assert_eq!(board.get(0, 0), Some(None));
        assert!(board.is_blocked(-1, 5));
        assert!(board.is_blocked(0, 12));
        assert!(!board.is_blocked(0, 11));
    }

    #[test]
    fn test_place_allocates_increasing_ids() {
        let mut board = Board::new();
        let a = board.place(0, 11, Red);
        let b = board.place(1, 11, Blue);
        assert!(b > a);
        assert_eq!(board.get(0, 11), Some(Some(Puyo { id: a, color: Red })));
    }

    #[test]
    fn test_try_place_reports_errors() {
        let mut board = Board::new();
        board.place(2, 3, Green);
        assert_eq!(
            board.try_place(2, 3, Red),
            Err(PlaceError::Occupied { col: 2, row: 3 })
        );
        assert_eq!(
            board.try_place(6, 0, Red),
            Err(PlaceError::OutOfBounds { col: 6, row: 0 })
        );
        assert_eq!(board.puyo_count(), 1);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_place_on_occupied_cell_panics() {
        let mut board = Board::new();
        board.place(0, 11, Red);
        board.place(0, 11, Blue);
    }

    #[test]
    fn test_from_rows_aligns_to_bottom() {
        let board = Board::from_rows(&["..Y...", "RB...P"]);
        assert_eq!(
            colors_of(&board),
            vec![(2, 10, Yellow), (0, 11, Red), (1, 11, Blue), (5, 11, Purple)]
        );
    }

    #[test]
    fn test_gravity_compacts_column_in_one_pass() {
        let mut board = Board::new();
        board.place(0, 2, Red);
        board.place(0, 5, Blue);
        board.place(0, 9, Green);

        assert!(board.resolve_gravity_step());
        assert_eq!(
            colors_of(&board),
            vec![(0, 9, Red), (0, 10, Blue), (0, 11, Green)]
        );

        let falling = board.falling();
        assert_eq!(falling.len(), 3);
        // Bottom-most cell is discovered first.
        assert_eq!((falling[0].from_row, falling[0].to_row), (9, 11));
        assert_eq!((falling[2].from_row, falling[2].to_row), (2, 9));
        assert_eq!(falling[2].top, 80.0);
        assert_eq!(falling[2].dest_top, 360.0);
    }

    #[test]
    fn test_gravity_is_idempotent_once_settled() {
        let mut board = Board::from_rows(&["R.B...", "......", ".G..Y."]);
        assert!(board.resolve_gravity_step());
        let settled = board.clone();
        assert!(!board.resolve_gravity_step());
        assert_eq!(colors_of(&board), colors_of(&settled));
        assert!(board.falling().is_empty());
    }

    #[test]
    fn test_gravity_keeps_identity() {
        let mut board = Board::new();
        let id = board.place(3, 0, Yellow);
        board.resolve_gravity_step();
        assert_eq!(board.get(3, 11), Some(Some(Puyo { id, color: Yellow })));
    }

    #[test]
    fn test_advance_fall_reaches_destination() {
        let mut board = Board::new();
        let id = board.place(1, 9, Red);
        board.resolve_gravity_step();

        // 80 px to cover at 16 px per tick.
        for _ in 0..4 {
            assert!(board.advance_fall(16.0));
        }
        assert_eq!(board.falling_top(id), Some(424.0));
        assert!(!board.advance_fall(16.0));
        assert_eq!(board.falling_top(id), None);
    }

    #[test]
    fn test_detect_clears_bottom_row() {
        let mut board = Board::from_rows(&["....R.", "BBBBR."]);
        let result = board.detect_clears(4);
        assert_eq!(
            result,
            Some(ClearResult {
                cleared_cells: 4,
                distinct_colors: 1
            })
        );
        assert!(!board.is_empty());
        assert_eq!(colors_of(&board), vec![(4, 10, Red), (4, 11, Red)]);
        assert_eq!(board.erasing().count(), 4);
    }

    #[test]
    fn test_detect_clears_leaves_small_regions_untouched() {
        let mut board = Board::from_rows(&["RR.GG.", "BRRYGG"]);
        let before = board.clone();
        assert_eq!(board.detect_clears(5), None);
        assert_eq!(board, before);
        assert_eq!(board.erasing().count(), 0);
    }

    #[test]
    fn test_detect_clears_multiple_regions_at_once() {
        let mut board = Board::from_rows(&["R..GG.", "RR.GG.", "RBBBBY"]);
        let yellow = board.get(5, 11).flatten();

        let result = board.detect_clears(4).expect("three regions qualify");
        assert_eq!(result.cleared_cells, 12);
        assert_eq!(result.distinct_colors, 3);
        assert_eq!(board.puyo_count(), 1);
        assert_eq!(board.get(5, 11).flatten(), yellow);
    }

    #[test]
    fn test_full_clear_leaves_board_empty() {
        let mut board = Board::from_rows(&["GG....", "GG...."]);
        assert!(board.detect_clears(4).is_some());
        assert!(board.is_empty());
    }

    #[test]
    fn test_diagonal_cells_do_not_connect() {
        let mut board = Board::from_rows(&["R.....", ".R....", "..R...", "...R.."]);
        assert_eq!(board.detect_clears(4), None);
    }

    #[test]
    fn test_erase_blinks_in_quarters() {
        let mut board = Board::from_rows(&["YYYY.."]);
        board.detect_clears(4);

        let visible = |b: &Board| b.erasing().all(|(_, v)| v);

        assert!(board.advance_erase(0, 30));
        assert!(!visible(&board));
        assert!(board.advance_erase(10, 30));
        assert!(visible(&board));
        assert!(board.advance_erase(20, 30));
        assert!(!visible(&board));
        assert!(board.advance_erase(25, 30));
        assert!(visible(&board));
        assert!(board.advance_erase(30, 30));
        assert_eq!(board.erasing().count(), 4);

        assert!(!board.advance_erase(31, 30));
        assert_eq!(board.erasing().count(), 0);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_keeps_id_counter() {
        let mut board = Board::new();
        let first = board.place(0, 0, Red);
        board.clear();
        assert!(board.is_empty());
        assert!(board.place(0, 0, Red) > first);
    }
}
