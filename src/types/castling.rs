//! Castling side type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

/// The two castling directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastlingSide {
    /// Castling toward the h-file (O-O)
    King,
    /// Castling toward the a-file (O-O-O)
    Queen,
}

impl CastlingSide {
    /// Both sides in index order (King=0, Queen=1)
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            CastlingSide::King => 0,
            CastlingSide::Queen => 1,
        }
    }

    /// File the king ends up on (g for kingside, c for queenside)
    #[inline]
    #[must_use]
    pub const fn king_to_file(self) -> usize {
        match self {
            CastlingSide::King => 6,
            CastlingSide::Queen => 2,
        }
    }

    /// File the rook ends up on (f for kingside, d for queenside)
    #[inline]
    #[must_use]
    pub const fn rook_to_file(self) -> usize {
        match self {
            CastlingSide::King => 5,
            CastlingSide::Queen => 3,
        }
    }

    /// The king's destination square for this color
    #[inline]
    #[must_use]
    pub const fn king_to(self, color: Color) -> Square {
        Square::from_coords(self.king_to_file(), color.back_rank())
    }

    /// The rook's destination square for this color
    #[inline]
    #[must_use]
    pub const fn rook_to(self, color: Color) -> Square {
        Square::from_coords(self.rook_to_file(), color.back_rank())
    }

    /// Which side a king move heads toward, judged by destination file
    #[inline]
    #[must_use]
    pub(crate) fn from_direction(from: Square, to: Square) -> CastlingSide {
        if to.index() > from.index() {
            CastlingSide::King
        } else {
            CastlingSide::Queen
        }
    }
}
