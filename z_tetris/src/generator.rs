use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::piece::{Piece, PieceKind};

/// Source of new pieces
pub trait PieceGenerator: Send {
    fn next_kind(&mut self) -> PieceKind;

    /// Next piece at its spawn position on a grid `cols` wide
    fn generate(&mut self, cols: usize) -> Piece {
        Piece::spawn(self.next_kind(), cols)
    }
}

/// Independent uniform draw over the seven kinds, no bag
pub struct RandomPieces {
    rng: StdRng,
}

impl RandomPieces {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl PieceGenerator for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }
}

/// Replays a fixed list of kinds in a cycle
pub struct SequencePieces {
    kinds: Vec<PieceKind>,
    position: usize,
}

impl SequencePieces {
    /// An empty list falls back to a cycle of all seven kinds
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let mut kinds: Vec<PieceKind> = kinds.into_iter().collect();
        if kinds.is_empty() {
            kinds = PieceKind::ALL.to_vec();
        }
        Self { kinds, position: 0 }
    }
}

impl PieceGenerator for SequencePieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.position];
        self.position = (self.position + 1) % self.kinds.len();
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sequence_cycles() {
        let mut pieces = SequencePieces::new([PieceKind::I, PieceKind::O]);
        let kinds: Vec<PieceKind> = (0..5).map(|_| pieces.next_kind()).collect();
        assert_eq!(
            kinds,
            vec![PieceKind::I, PieceKind::O, PieceKind::I, PieceKind::O, PieceKind::I]
        );
    }

    #[test]
    fn test_generated_piece_is_at_spawn() {
        let mut pieces = SequencePieces::new([PieceKind::I, PieceKind::T]);
        let piece = pieces.generate(10);
        assert_eq!((piece.kind, piece.x, piece.y), (PieceKind::I, 3, 0));
        let piece = pieces.generate(10);
        assert_eq!((piece.kind, piece.x, piece.y), (PieceKind::T, 4, 0));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomPieces::seeded(42);
        let mut b = RandomPieces::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }

    #[test]
    fn test_random_covers_all_kinds() {
        let mut pieces = RandomPieces::seeded(7);
        let mut counts: HashMap<PieceKind, usize> = HashMap::new();
        for _ in 0..7000 {
            *counts.entry(pieces.next_kind()).or_default() += 1;
        }
        assert_eq!(counts.len(), 7);
        // Roughly uniform: each kind close to 1000 draws
        for (kind, count) in counts {
            assert!((700..1300).contains(&count), "{:?}: {}", kind, count);
        }
    }
}
