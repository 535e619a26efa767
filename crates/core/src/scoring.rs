//! Scoring module - point awards for clears, soft drops and full clears
//!
//! A clear is scored from three bonus tables indexed by chain length, number of
//! cleared cells and number of distinct colours. Each index is capped at the last
//! table entry, so arbitrarily long chains keep scoring with the final bonus.

/// Chain bonus by chain count (index 1 = first clear of a drop sequence).
pub const CHAIN_BONUS: [u32; 24] = [
    0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512, 544,
    576, 608, 640, 672,
];

/// Bonus by number of cells cleared in one pass.
pub const PIECE_BONUS: [u32; 12] = [0, 0, 0, 0, 2, 3, 4, 5, 6, 7, 10, 10];

/// Bonus by number of distinct colours cleared in one pass.
pub const COLOR_BONUS: [u32; 6] = [0, 0, 3, 6, 12, 24];

/// Points per cleared cell before scaling.
pub const POINTS_PER_CELL: u32 = 10;

/// Awarded per row descended while fast drop is held.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Awarded when a chain leaves the board completely empty.
pub const FULL_CLEAR_POINTS: u32 = 3600;

#[inline]
fn capped(table: &[u32], index: usize) -> u32 {
    table[index.min(table.len() - 1)]
}

/// Score one clear pass.
///
/// `scale = chain + piece + colour bonus`, forced to 1 when all three are zero, so
/// every clear is worth at least `cleared_cells * 10`.
pub fn score_for_clear(chain: u32, cleared_cells: usize, distinct_colors: usize) -> u32 {
    let mut scale = capped(&CHAIN_BONUS, chain as usize)
        + capped(&PIECE_BONUS, cleared_cells)
        + capped(&COLOR_BONUS, distinct_colors);
    if scale == 0 {
        scale = 1;
    }
    scale
        .saturating_mul(cleared_cells as u32)
        .saturating_mul(POINTS_PER_CELL)
}

pub fn score_for_soft_drop() -> u32 {
    SOFT_DROP_POINTS
}

pub fn score_for_full_clear() -> u32 {
    FULL_CLEAR_POINTS
}

/// Running total. Only ever grows; a new game starts from a new `Score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    total: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_color_four_cell_first_chain() {
        // chain 8 + piece 2 + colour 0 = 10 → 10 * 4 * 10
        assert_eq!(score_for_clear(1, 4, 1), 400);
    }

    #[test]
    fn test_second_chain_bigger_group() {
        // chain 16 + piece 3 + colour 0 = 19 → 19 * 5 * 10
        assert_eq!(score_for_clear(2, 5, 1), 950);
    }

    #[test]
    fn test_two_colors_in_one_pass() {
        // chain 8 + piece 5 (8 cells) + colour 3 = 16 → 16 * 8 * 10
        assert_eq!(score_for_clear(1, 8, 2), 1280);
    }

    #[test]
    fn test_zero_scale_forced_to_one() {
        // chain 0, piece 0, colour 0 (possible with a threshold below 4)
        assert_eq!(score_for_clear(0, 3, 1), 30);
        assert_eq!(score_for_clear(0, 2, 0), 20);
    }

    #[test]
    fn test_tables_are_capped() {
        let capped_chain = score_for_clear(1_000, 4, 1);
        assert_eq!(capped_chain, (672 + 2) * 4 * 10);

        // 40 cells: piece bonus capped at 10, colours capped at 24.
        assert_eq!(score_for_clear(1, 40, 99), (8 + 10 + 24) * 40 * 10);
    }

    #[test]
    fn test_clear_never_below_floor() {
        for chain in [0, 1, 5, 23, 24, 500] {
            for cells in [1usize, 4, 11, 12, 72] {
                for colors in [0usize, 1, 5, 6, 20] {
                    assert!(score_for_clear(chain, cells, colors) >= cells as u32 * 10);
                }
            }
        }
    }

    #[test]
    fn test_fixed_awards() {
        assert_eq!(score_for_soft_drop(), 1);
        assert_eq!(score_for_full_clear(), 3600);
    }

    #[test]
    fn test_score_accumulates_and_saturates() {
        let mut score = Score::new();
        score.add(10);
        score.add(score_for_full_clear());
        assert_eq!(score.total(), 3610);

        score.add(u32::MAX);
        assert_eq!(score.total(), u32::MAX);
    }
}
