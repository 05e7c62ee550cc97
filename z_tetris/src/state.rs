use serde::{Deserialize, Serialize};

use crate::game::GameStatus;
use crate::grid::Grid;
use crate::piece::PieceKind;

/// What a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: u64,
    /// Settled blocks, with the falling piece drawn in while running
    pub well: Grid,
    pub next: PieceKind,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u64,
    pub status: GameStatus,
    pub play_time_ms: u64,
}
