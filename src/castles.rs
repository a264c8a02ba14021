//! Castling rights: unmoved rooks and precomputed castling paths.

use crate::attacks::between;
use crate::setup::Setup;
use crate::types::{Bitboard, CastlingSide, Color, Piece, Square};

/// Castling rights for both sides.
///
/// For each (color, side) cell this stores the origin square of the
/// castling rook and the path mask: every square that has to be empty for
/// the castle, covering both the king's walk and the rook's walk. The
/// path includes the two destination squares and excludes the king's and
/// rook's origin squares, so neither piece blocks its own castle when the
/// mask is tested against occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Castles {
    unmoved_rooks: Bitboard,
    rook: [[Option<Square>; 2]; 2],
    path: [[Bitboard; 2]; 2],
}

impl Castles {
    /// No castling rights at all
    #[must_use]
    pub const fn empty() -> Self {
        Castles {
            unmoved_rooks: Bitboard::EMPTY,
            rook: [[None; 2]; 2],
            path: [[Bitboard::EMPTY; 2]; 2],
        }
    }

    /// Derive castling rights from a setup.
    ///
    /// Scans each color's back rank for unmoved rooks: the lowest rook
    /// below the king becomes the queenside right, the highest rook above
    /// the king the kingside right. A color whose king is missing from its
    /// back rank gets no rights.
    #[must_use]
    pub fn from_setup(setup: &Setup) -> Self {
        let mut castles = Castles::empty();
        let rooks = setup.unmoved_rooks & setup.board.by_piece(Piece::Rook);
        for color in Color::BOTH {
            let backrank = Bitboard::backrank(color);
            let king = match setup.board.king_of(color) {
                Some(king) if backrank.contains(king) => king,
                _ => continue,
            };
            let candidates = rooks & setup.board.by_color(color) & backrank;
            if let Some(rook) = candidates.first() {
                if rook < king {
                    castles.add(color, CastlingSide::Queen, king, rook);
                }
            }
            if let Some(rook) = candidates.last() {
                if king < rook {
                    castles.add(color, CastlingSide::King, king, rook);
                }
            }
        }
        castles
    }

    fn add(&mut self, color: Color, side: CastlingSide, king: Square, rook: Square) {
        let king_to = side.king_to(color);
        let rook_to = side.rook_to(color);
        self.unmoved_rooks = self.unmoved_rooks.with(rook);
        self.rook[color.index()][side.index()] = Some(rook);
        self.path[color.index()][side.index()] = (between(rook, rook_to).with(rook_to)
            | between(king, king_to).with(king_to))
        .without(king)
        .without(rook);
    }

    /// Whether no castling right remains for either color
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unmoved_rooks.is_empty()
    }

    /// The set of rooks still carrying a castling right
    #[inline]
    #[must_use]
    pub const fn unmoved_rooks(&self) -> Bitboard {
        self.unmoved_rooks
    }

    /// Whether the given right exists
    #[inline]
    #[must_use]
    pub fn has(&self, color: Color, side: CastlingSide) -> bool {
        self.rook[color.index()][side.index()].is_some()
    }

    /// Origin square of the castling rook, if the right exists
    #[inline]
    #[must_use]
    pub const fn rook_of(&self, color: Color, side: CastlingSide) -> Option<Square> {
        self.rook[color.index()][side.index()]
    }

    /// Squares that must be empty for the castle
    #[inline]
    #[must_use]
    pub const fn path_of(&self, color: Color, side: CastlingSide) -> Bitboard {
        self.path[color.index()][side.index()]
    }

    /// Drop the right whose rook stood on `sq`, if any
    pub(crate) fn discard_rook_at(&mut self, sq: Square) {
        if self.unmoved_rooks.contains(sq) {
            self.unmoved_rooks = self.unmoved_rooks.without(sq);
            for color in Color::BOTH {
                for side in CastlingSide::BOTH {
                    if self.rook[color.index()][side.index()] == Some(sq) {
                        self.rook[color.index()][side.index()] = None;
                        self.path[color.index()][side.index()] = Bitboard::EMPTY;
                    }
                }
            }
        }
    }

    /// Drop both of a color's rights
    pub(crate) fn discard_color(&mut self, color: Color) {
        self.unmoved_rooks = self.unmoved_rooks - Bitboard::backrank(color);
        for side in CastlingSide::BOTH {
            self.rook[color.index()][side.index()] = None;
            self.path[color.index()][side.index()] = Bitboard::EMPTY;
        }
    }
}

impl Default for Castles {
    /// Castling rights of the standard starting position
    fn default() -> Self {
        Castles::from_setup(&Setup::default())
    }
}
