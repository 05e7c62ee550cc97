use serde::{Deserialize, Serialize};

/// Largest shape matrix side (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Block color token stored in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    LightBlue,
    Yellow,
    Purple,
    Green,
    Red,
    Navy,
    Orange,
}

/// Square occupancy matrix of a piece, N x N with N in 2..=4
///
/// Cells outside the N x N square are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build from rows of 0/1, which must form a square of side 2..=4
    pub const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N >= 2 && N <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Shape { size: N, cells }
    }

    /// Side of the square matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offsets (dx, dy) of occupied cells, row by row
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }

    /// Quarter turn clockwise: new[row][col] = old[N - 1 - col][row]
    pub fn rotated(&self) -> Shape {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (row, line) in cells.iter_mut().enumerate().take(n) {
            for (col, cell) in line.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - col][row];
            }
        }
        Shape { size: n, cells }
    }
}

const SHAPE_I: Shape = Shape::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const SHAPE_O: Shape = Shape::from_rows([[1, 1], [1, 1]]);
const SHAPE_T: Shape = Shape::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
const SHAPE_S: Shape = Shape::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
const SHAPE_Z: Shape = Shape::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);
const SHAPE_J: Shape = Shape::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
const SHAPE_L: Shape = Shape::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]);

/// The seven tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Shape in spawn orientation
    pub fn shape(&self) -> Shape {
        match self {
            PieceKind::I => SHAPE_I,
            PieceKind::O => SHAPE_O,
            PieceKind::T => SHAPE_T,
            PieceKind::S => SHAPE_S,
            PieceKind::Z => SHAPE_Z,
            PieceKind::J => SHAPE_J,
            PieceKind::L => SHAPE_L,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::LightBlue,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::J => Color::Navy,
            PieceKind::L => Color::Orange,
        }
    }

    /// Column where a piece of this kind spawns: floor(cols / 2) - floor(N / 2)
    pub fn spawn_x(&self, cols: usize) -> isize {
        (cols / 2) as isize - (self.shape().size() / 2) as isize
    }
}

/// A tetromino on the board
///
/// `(x, y)` is the top-left corner of the shape matrix in grid coordinates.
/// `y` may be negative while the piece is partly above the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Color,
    pub x: isize,
    pub y: isize,
}

impl Piece {
    pub fn new(kind: PieceKind, x: isize, y: isize) -> Self {
        Piece {
            kind,
            shape: kind.shape(),
            color: kind.color(),
            x,
            y,
        }
    }

    /// Fresh piece at its spawn position on a grid `cols` wide
    pub fn spawn(kind: PieceKind, cols: usize) -> Self {
        Piece::new(kind, kind.spawn_x(cols), 0)
    }

    /// Absolute grid coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx as isize, self.y + dy as isize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().filled_cells().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_shape_sizes() {
        assert_eq!(PieceKind::I.shape().size(), 4);
        assert_eq!(PieceKind::O.shape().size(), 2);
        for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            assert_eq!(kind.shape().size(), 3);
        }
    }

    #[test]
    fn test_spawn_positions() {
        assert_eq!(Piece::spawn(PieceKind::I, 10).x, 3);
        assert_eq!(Piece::spawn(PieceKind::O, 10).x, 4);
        assert_eq!(Piece::spawn(PieceKind::T, 10).x, 4);
        assert_eq!(Piece::spawn(PieceKind::L, 10).y, 0);
    }

    #[test]
    fn test_rotate_clockwise() {
        // T points up; a clockwise turn makes it point right
        let rotated = PieceKind::T.shape().rotated();
        assert_eq!(rotated, Shape::from_rows([[0, 1, 0], [0, 1, 1], [0, 1, 0]]));

        // Horizontal I becomes vertical in column 2
        let rotated = PieceKind::I.shape().rotated();
        let cells: Vec<(usize, usize)> = rotated.filled_cells().collect();
        assert_eq!(cells, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let back = shape.rotated().rotated().rotated().rotated();
            assert_eq!(back, shape, "{:?}", kind);
        }
    }

    #[test]
    fn test_o_rotation_is_stable() {
        assert_eq!(PieceKind::O.shape().rotated(), PieceKind::O.shape());
    }

    #[test]
    fn test_piece_cells() {
        let piece = Piece::new(PieceKind::O, 4, -1);
        let cells: Vec<(isize, isize)> = piece.cells().collect();
        assert_eq!(cells, vec![(4, -1), (5, -1), (4, 0), (5, 0)]);
        assert_eq!(piece.color, Color::Yellow);
    }
}
