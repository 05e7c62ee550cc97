//! Collision checks and the moves built on them
//!
//! Rows above the grid count as free space, so pieces may spawn and rotate
//! partly above row 0. Nothing here mutates a piece unless the move is valid.

use crate::grid::Grid;
use crate::piece::{Piece, Shape};

/// Whether `piece`, shifted by (`offset_x`, `offset_y`) and optionally given
/// `shape` instead of its own, fits the grid
pub fn is_valid_move(
    grid: &Grid,
    piece: &Piece,
    offset_x: isize,
    offset_y: isize,
    shape: Option<&Shape>,
) -> bool {
    let shape = shape.unwrap_or(&piece.shape);
    shape.filled_cells().all(|(dx, dy)| {
        let x = piece.x + dx as isize + offset_x;
        let y = piece.y + dy as isize + offset_y;
        if x < 0 || x >= grid.cols() as isize || y >= grid.rows() as isize {
            return false;
        }
        y < 0 || grid.get(x, y).is_some_and(|cell| cell.is_empty())
    })
}

/// Shift the piece if the target position is free
pub fn try_translate(grid: &Grid, piece: &mut Piece, dx: isize, dy: isize) -> bool {
    if is_valid_move(grid, piece, dx, dy, None) {
        piece.x += dx;
        piece.y += dy;
        true
    } else {
        false
    }
}

/// Rotate clockwise in place, without wall kicks
pub fn try_rotate(grid: &Grid, piece: &mut Piece) -> bool {
    let rotated = piece.shape.rotated();
    if is_valid_move(grid, piece, 0, 0, Some(&rotated)) {
        piece.shape = rotated;
        true
    } else {
        false
    }
}

/// Move the piece down until it rests, returning the rows travelled
pub fn drop_to_floor(grid: &Grid, piece: &mut Piece) -> usize {
    let mut rows = 0;
    while try_translate(grid, piece, 0, 1) {
        rows += 1;
    }
    rows
}
