//! Unvalidated position snapshot.

use crate::board::Board;
use crate::types::{Bitboard, Color, Square};

/// Check counters for three-check style material, carried through FEN
/// unchanged. Move generation never reads this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemainingChecks {
    pub white: u32,
    pub black: u32,
}

impl Default for RemainingChecks {
    fn default() -> Self {
        RemainingChecks { white: 3, black: 3 }
    }
}

/// Everything a FEN string can describe, with no legality guarantees.
///
/// A `Setup` is plain data: fields are public and adjusted directly, or
/// with struct-update syntax. Turning one into a playable position is
/// `Position::from_setup`, which is where validation happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Setup {
    pub board: Board,
    pub turn: Color,
    /// Rooks that have never moved, the raw castling-rights encoding
    pub unmoved_rooks: Bitboard,
    /// En passant target square exactly as given, unvalidated
    pub ep_square: Option<Square>,
    pub remaining_checks: Option<RemainingChecks>,
    pub halfmoves: u32,
    pub fullmoves: u32,
}

impl Setup {
    /// An empty board, white to move, no rights or counters
    #[must_use]
    pub fn empty() -> Self {
        Setup {
            board: Board::empty(),
            turn: Color::White,
            unmoved_rooks: Bitboard::EMPTY,
            ep_square: None,
            remaining_checks: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }
}

impl Default for Setup {
    /// The standard starting position
    fn default() -> Self {
        Setup {
            board: Board::new(),
            turn: Color::White,
            unmoved_rooks: Bitboard::CORNERS,
            ep_square: None,
            remaining_checks: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }
}
