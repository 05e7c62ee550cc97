use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::piece::Piece;

pub const LINES_PER_LEVEL: u32 = 10;
pub const BASE_DROP_INTERVAL_MS: u64 = 1000;
pub const DROP_INTERVAL_STEP_MS: u64 = 50;
pub const MIN_DROP_INTERVAL_MS: u64 = 100;

/// Points for clearing `lines` rows at once, before the level multiplier
pub fn line_points(lines: usize) -> u64 {
    match lines {
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        _ => 100,
    }
}

/// Gravity period for `level`
pub fn drop_interval_for(level: u32) -> u64 {
    let slowdown = u64::from(level.saturating_sub(1)) * DROP_INTERVAL_STEP_MS;
    BASE_DROP_INTERVAL_MS
        .saturating_sub(slowdown)
        .max(MIN_DROP_INTERVAL_MS)
}

/// Score, cleared lines and the level derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
        }
    }
}

impl Scoring {
    /// Account for one clear event of `cleared` rows
    ///
    /// Points use the level in effect before the event.
    pub fn apply_clear(&mut self, cleared: usize) {
        if cleared == 0 {
            return;
        }
        self.score += line_points(cleared) * u64::from(self.level);
        self.lines += cleared as u32;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        self.drop_interval_ms = drop_interval_for(self.level);
    }
}

/// Merge a landed piece, remove full rows and update the score;
/// returns the number of rows cleared
pub fn settle(grid: &mut Grid, piece: &Piece, scoring: &mut Scoring) -> usize {
    grid.merge(piece);
    let cleared = grid.clear_full_rows();
    scoring.apply_clear(cleared);
    cleared
}
