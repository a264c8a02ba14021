//! Colors and piece types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two armies. Discriminants double as bitboard-array indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Both colors in index order
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The other army. An involution: `c.opposite().opposite() == c`.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Home rank of the royal pieces: 0 for white, 7 for black
    #[inline]
    #[must_use]
    pub const fn back_rank(self) -> usize {
        self.index() * 7
    }

    /// Rank a structurally valid en passant target sits on when this
    /// side is to move: 5 after black's double push, 2 after white's
    #[inline]
    #[must_use]
    pub(crate) const fn ep_rank(self) -> usize {
        match self {
            Color::White => 5,
            Color::Black => 2,
        }
    }

    /// Square-index delta of a single pawn push
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_push(self) -> i32 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Turn letter used in FEN
    #[inline]
    #[must_use]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// Piece types, in the order the board stores their bitboards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece types in index order
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Look up a piece type by its letter, either case
    #[must_use]
    pub const fn from_char(c: char) -> Option<Piece> {
        match c {
            'p' | 'P' => Some(Piece::Pawn),
            'n' | 'N' => Some(Piece::Knight),
            'b' | 'B' => Some(Piece::Bishop),
            'r' | 'R' => Some(Piece::Rook),
            'q' | 'Q' => Some(Piece::Queen),
            'k' | 'K' => Some(Piece::King),
            _ => None,
        }
    }

    /// Lowercase letter: UCI promotions and black FEN pieces
    #[inline]
    #[must_use]
    pub const fn lower_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Uppercase letter: SAN prefixes and white FEN pieces
    #[inline]
    #[must_use]
    pub const fn upper_char(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    /// FEN letter, cased by the owning color
    #[inline]
    #[must_use]
    pub const fn fen_char(self, color: Color) -> char {
        match color {
            Color::White => self.upper_char(),
            Color::Black => self.lower_char(),
        }
    }
}

/// Promotion choices in generation order, queen first
pub(crate) const PROMOTION_PIECES: [Piece; 4] =
    [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];
